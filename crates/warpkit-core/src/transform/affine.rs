//! Affine transform implementation.
//!
//! This module provides an affine transform built from rotation, shear,
//! scaling and translation components around a fixed center.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use nalgebra::{DMatrix, DVector, Matrix2, Matrix3};
use serde::{Deserialize, Serialize};
use crate::error::{Result, WarpError};
use crate::tensor::from_host;
use super::linear::LinearTransform;
use super::trait_::Transform;

/// Tolerance used when checking that a shear matrix preserves volume.
const SHEAR_DET_TOLERANCE: f64 = 1e-9;

/// Components of an affine transform.
///
/// Every component is optional; missing ones default to the identity
/// (no rotation, no shear, unit scaling, zero translation, center at origin).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffineParams {
    pub center: Option<Vec<f64>>,
    pub scaling: Option<Vec<f64>>,
    /// Rotation angles in radians: one for 2D, three (x, y, z) for 3D.
    pub angles: Option<Vec<f64>>,
    pub shear: Option<Vec<Vec<f64>>>,
    pub translation: Option<Vec<f64>>,
}

impl AffineParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(mut self, center: impl Into<Vec<f64>>) -> Self {
        self.center = Some(center.into());
        self
    }

    /// Use the center of an image with the given shape.
    pub fn center_of(self, shape: &[usize]) -> Self {
        let center = center_of(shape);
        self.center(center)
    }

    pub fn scaling(mut self, scaling: impl Into<Vec<f64>>) -> Self {
        self.scaling = Some(scaling.into());
        self
    }

    pub fn angles(mut self, angles: impl Into<Vec<f64>>) -> Self {
        self.angles = Some(angles.into());
        self
    }

    pub fn shear(mut self, shear: Vec<Vec<f64>>) -> Self {
        self.shear = Some(shear);
        self
    }

    pub fn translation(mut self, translation: impl Into<Vec<f64>>) -> Self {
        self.translation = Some(translation.into());
        self
    }
}

/// Center of an image in the `[0, 1)` domain.
///
/// The center of a length-`n` axis lies at pixel `(n - 1) / 2`, which is
/// `(n - 1) / (2n)` in normalized units.
pub fn center_of(shape: &[usize]) -> Vec<f64> {
    shape
        .iter()
        .map(|&n| (n as f64 - 1.0) / (2.0 * n as f64))
        .collect()
}

/// Affine Transform (rotation, shear, scaling and translation).
///
/// Computes `T(x) = A (x - c) + c + t` with `A = R G S`, where `R` is the
/// rotation, `G` the shear and `S` the diagonal scaling. The result is
/// folded into one augmented matrix and applied as a [`LinearTransform`].
#[derive(Debug, Clone)]
pub struct AffineTransform<B: Backend> {
    linear: LinearTransform<B>,
    params: AffineParams,
}

impl<B: Backend> AffineTransform<B> {
    /// Create a new affine transform.
    ///
    /// # Errors
    /// `InvalidConfiguration` if a component does not fit `ndim`.
    pub fn new(ndim: usize, params: AffineParams, device: &B::Device) -> Result<Self> {
        let matrix = affine_matrix(ndim, &params)?;

        let values: Vec<f32> = (0..ndim)
            .flat_map(|r| (0..=ndim).map(move |c| (r, c)))
            .map(|(r, c)| matrix[(r, c)] as f32)
            .collect();
        let linear = LinearTransform::new(from_host(values, [ndim, ndim + 1], device))?;

        tracing::debug!("Created {}D affine transform", ndim);
        Ok(Self { linear, params })
    }

    /// Create an identity affine transform.
    pub fn identity(ndim: usize, device: &B::Device) -> Result<Self> {
        Self::new(ndim, AffineParams::default(), device)
    }

    /// Get the components this transform was built from.
    pub fn params(&self) -> &AffineParams {
        &self.params
    }

    /// Get the augmented `[ndim, ndim + 1]` matrix.
    pub fn matrix(&self) -> Tensor<B, 2> {
        self.linear.matrix()
    }
}

impl<B: Backend> Transform<B> for AffineTransform<B> {
    fn ndim(&self) -> usize {
        self.linear.ndim()
    }

    fn transform_points(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        self.linear.transform_points(points)
    }
}

impl<B: Backend> fmt::Display for AffineTransform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Affine({}D)", self.ndim())
    }
}

/// Build the augmented matrix `[A | c + t - A c]`.
fn affine_matrix(ndim: usize, params: &AffineParams) -> Result<DMatrix<f64>> {
    if ndim == 0 {
        return Err(WarpError::invalid_configuration("Affine transform needs at least one dimension"));
    }

    let center = vector_param("center", ndim, params.center.as_deref(), 0.0)?;
    let scaling = vector_param("scaling", ndim, params.scaling.as_deref(), 1.0)?;
    let translation = vector_param("translation", ndim, params.translation.as_deref(), 0.0)?;
    let rotation = rotation_matrix(ndim, params.angles.as_deref())?;
    let shear = shear_matrix(ndim, params.shear.as_deref())?;

    let a = rotation * shear * DMatrix::from_diagonal(&scaling);
    let offset = &center + &translation - &a * &center;

    let mut matrix = DMatrix::zeros(ndim, ndim + 1);
    matrix.view_mut((0, 0), (ndim, ndim)).copy_from(&a);
    matrix.set_column(ndim, &offset);
    Ok(matrix)
}

fn vector_param(name: &str, ndim: usize, values: Option<&[f64]>, fill: f64) -> Result<DVector<f64>> {
    match values {
        None => Ok(DVector::from_element(ndim, fill)),
        Some(values) if values.len() == ndim => Ok(DVector::from_column_slice(values)),
        Some(values) => Err(WarpError::invalid_configuration(format!(
            "Affine {} has {} components, expected {}",
            name,
            values.len(),
            ndim
        ))),
    }
}

fn rotation_matrix(ndim: usize, angles: Option<&[f64]>) -> Result<DMatrix<f64>> {
    let Some(angles) = angles else {
        return Ok(DMatrix::identity(ndim, ndim));
    };

    match (ndim, angles.len()) {
        (2, 1) => {
            let (s, c) = angles[0].sin_cos();
            let r = Matrix2::new(c, -s, s, c);
            Ok(DMatrix::from_iterator(2, 2, r.iter().copied()))
        }
        (3, 3) => {
            let (sx, cx) = angles[0].sin_cos();
            let (sy, cy) = angles[1].sin_cos();
            let (sz, cz) = angles[2].sin_cos();

            let rx = Matrix3::new(1.0, 0.0, 0.0, 0.0, cx, -sx, 0.0, sx, cx);
            let ry = Matrix3::new(cy, 0.0, sy, 0.0, 1.0, 0.0, -sy, 0.0, cy);
            let rz = Matrix3::new(cz, -sz, 0.0, sz, cz, 0.0, 0.0, 0.0, 1.0);

            let r = rx * ry * rz;
            Ok(DMatrix::from_iterator(3, 3, r.iter().copied()))
        }
        (2 | 3, n) => Err(WarpError::invalid_configuration(format!(
            "{}D rotation needs {} angle(s), got {}",
            ndim,
            if ndim == 2 { 1 } else { 3 },
            n
        ))),
        _ => Err(WarpError::invalid_configuration(format!(
            "Rotation angles are only supported in 2D and 3D, not {}D",
            ndim
        ))),
    }
}

fn shear_matrix(ndim: usize, shear: Option<&[Vec<f64>]>) -> Result<DMatrix<f64>> {
    let Some(rows) = shear else {
        return Ok(DMatrix::identity(ndim, ndim));
    };

    if rows.len() != ndim || rows.iter().any(|row| row.len() != ndim) {
        return Err(WarpError::invalid_configuration(format!(
            "Shear matrix must be {}x{}",
            ndim, ndim
        )));
    }

    let matrix = DMatrix::from_fn(ndim, ndim, |r, c| rows[r][c]);
    let det = matrix.determinant();
    if (det - 1.0).abs() > SHEAR_DET_TOLERANCE {
        tracing::warn!("Shear matrix has determinant {:.6}, it does not preserve volume", det);
    }
    Ok(matrix)
}
