//! B-Spline transform implementation.
//!
//! This module provides a B-Spline free-form deformation transform.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::interpolation::config::{BoundaryMode, InterpolatorConfig};
use crate::interpolation::spline::SplineCoefficients;
use crate::tensor::{from_host, num_elements, strides, to_host};
use super::trait_::Transform;

/// B-Spline Transform (Free-form deformation).
///
/// Uses a grid of control points to define a smooth deformation field.
/// The control grid has shape `(ndim, N1, ..., Nndim)`: component `i` holds
/// the displacement along axis `i` at every control point. Control points
/// span the `[0, 1]` domain, so a point `x` lands at control index
/// `x * (N - 1)`.
#[derive(Debug, Clone)]
pub struct BSplineTransform<B: Backend> {
    /// Control point displacements `[ndim, N1 * ... * Nndim]`
    control_grid: Tensor<B, 2>,
    /// Control point grid dimensions
    grid_size: Vec<usize>,
    config: InterpolatorConfig,
    /// Prefiltered coefficients, one per displacement component
    components: Vec<SplineCoefficients>,
}

impl<B: Backend> BSplineTransform<B> {
    /// Default interpolation settings: cubic, mirrored boundaries.
    pub fn default_config() -> InterpolatorConfig {
        InterpolatorConfig::default().with_mode(BoundaryMode::Mirror)
    }

    /// Create a new B-Spline transform with cubic mirrored interpolation.
    ///
    /// # Arguments
    /// * `control_grid` - Tensor of shape `[ndim, N1, ..., Nndim]`
    ///
    /// # Errors
    /// `InvalidConfiguration` if the leading axis is not `R - 1` long.
    pub fn new<const R: usize>(control_grid: Tensor<B, R>) -> Result<Self> {
        Self::with_config(control_grid, Self::default_config())
    }

    /// Create a new B-Spline transform with explicit interpolation settings.
    pub fn with_config<const R: usize>(control_grid: Tensor<B, R>, config: InterpolatorConfig) -> Result<Self> {
        let dims = control_grid.dims();
        if R < 2 || dims[0] != R - 1 {
            return Err(WarpError::invalid_configuration(format!(
                "First axis of control grid should be equal to the transform's ndim {}, got {}",
                R.saturating_sub(1),
                dims[0]
            )));
        }
        let grid_size = dims[1..].to_vec();
        let flat = control_grid.reshape([R - 1, num_elements(&grid_size)]);
        Self::from_coefficients(flat, &grid_size, config)
    }

    /// Create a transform from flattened control point displacements.
    ///
    /// # Arguments
    /// * `coefficients` - Tensor of shape `[ndim, N1 * ... * Nndim]`
    /// * `grid_size` - Number of control points along each dimension
    /// * `config` - Spline order and boundary handling of the control grid
    pub fn from_coefficients(
        coefficients: Tensor<B, 2>,
        grid_size: &[usize],
        config: InterpolatorConfig,
    ) -> Result<Self> {
        config.validate()?;

        let [ndim, count] = coefficients.dims();
        if ndim != grid_size.len() || count != num_elements(grid_size) {
            return Err(WarpError::invalid_configuration(format!(
                "Control grid of {} components with {} points does not fit grid size {:?}",
                ndim, count, grid_size
            )));
        }
        if grid_size.iter().any(|&n| n == 0) {
            return Err(WarpError::invalid_configuration("Control grid has an empty axis"));
        }

        let values = to_host(coefficients.clone())?;
        let components = values
            .chunks(count)
            .map(|component| SplineCoefficients::new(component, grid_size, config.order, config.mode))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Created {}D B-spline transform, control grid {:?}, order {}",
            ndim,
            grid_size,
            config.order
        );

        Ok(Self {
            control_grid: coefficients,
            grid_size: grid_size.to_vec(),
            config,
            components,
        })
    }

    /// Create a transform from a per-voxel displacement field.
    ///
    /// The field has shape `[ndim, S1, ..., Sndim]`. Every spatial axis is
    /// padded with one trailing zero so that the control grid is one sample
    /// larger than the field. Applied to a [`crate::image::Grid`] of shape
    /// `S`, the transform then reproduces the field.
    pub fn from_deformation_field<const R: usize>(field: Tensor<B, R>, config: InterpolatorConfig) -> Result<Self> {
        let dims = field.dims();
        if R < 2 || dims[0] != R - 1 {
            return Err(WarpError::invalid_configuration(format!(
                "First axis of deformation field should be equal to its ndim {}, got {}",
                R.saturating_sub(1),
                dims[0]
            )));
        }

        let device = field.device();
        let padded_dims: [usize; R] = std::array::from_fn(|i| if i == 0 { dims[0] } else { dims[i] + 1 });
        let padded = pad_trailing(&to_host(field)?, &dims, &padded_dims);

        Self::with_config(from_host(padded, padded_dims, &device), config)
    }

    /// Get the flattened control grid `[ndim, N1 * ... * Nndim]`.
    pub fn control_grid(&self) -> Tensor<B, 2> {
        self.control_grid.clone()
    }

    /// Get the grid size.
    pub fn grid_size(&self) -> &[usize] {
        &self.grid_size
    }

    pub fn config(&self) -> &InterpolatorConfig {
        &self.config
    }
}

/// Copy `data` of shape `from` into a zero-filled array of the larger shape `to`.
fn pad_trailing(data: &[f32], from: &[usize], to: &[usize]) -> Vec<f32> {
    let src_strides = strides(from);
    let dst_strides = strides(to);
    let mut padded = vec![0.0; num_elements(to)];

    for (flat, &value) in data.iter().enumerate() {
        let offset: usize = src_strides
            .iter()
            .zip(from)
            .zip(&dst_strides)
            .map(|((&stride, &n), &dst)| (flat / stride) % n * dst)
            .sum();
        padded[offset] = value;
    }
    padded
}

impl<B: Backend> Transform<B> for BSplineTransform<B> {
    fn ndim(&self) -> usize {
        self.grid_size.len()
    }

    fn transform_points(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        let [ndim, n] = points.dims();
        let device = points.device();

        // Scale the [0, 1) domain onto control grid indices
        let host = to_host(points.clone())?;
        let scaled: Vec<f32> = host
            .chunks(n.max(1))
            .zip(&self.grid_size)
            .flat_map(|(row, &size)| {
                let factor = (size - 1) as f32;
                row.iter().map(move |&x| x * factor)
            })
            .collect();

        let mut displacement = Vec::with_capacity(ndim * n);
        for component in &self.components {
            displacement.extend(component.sample(&scaled, self.config.mode, self.config.cval)?);
        }

        Ok(points + from_host(displacement, [ndim, n], &device))
    }
}

impl<B: Backend> fmt::Display for BSplineTransform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size: Vec<String> = self.grid_size.iter().map(ToString::to_string).collect();
        write!(f, "BSpline({}D, {})", self.ndim(), size.join("x"))
    }
}
