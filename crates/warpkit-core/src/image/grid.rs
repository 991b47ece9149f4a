//! Sampling grids.
//!
//! A [`Grid`] holds one coordinate per sample of an N-d array, stored as a
//! `[ndim, N]` tensor with the samples in row-major order. Grids are values:
//! scaling or transforming one returns a new grid.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use nalgebra::DMatrix;
use crate::error::{Result, WarpError};
use crate::tensor::{from_host, num_elements, strides, to_host};
use crate::transform::Transform;

/// Sampling grid that can be transformed.
#[derive(Debug, Clone)]
pub struct Grid<B: Backend> {
    /// Point coordinates `[ndim, N]`
    coordinates: Tensor<B, 2>,
    /// Spatial shape; its product is `N`
    shape: Vec<usize>,
}

impl<B: Backend> Grid<B> {
    /// Generate a regular grid covering `[0, 1)` along every axis.
    ///
    /// Axis `a` of length `n` takes the values `0, 1/n, ..., (n - 1)/n`.
    ///
    /// # Arguments
    /// * `shape` - The grid shape `[N1, ..., Nndim]`
    /// * `device` - The device to create the tensor on
    pub fn new(shape: &[usize], device: &B::Device) -> Result<Self> {
        if shape.is_empty() || shape.iter().any(|&n| n == 0) {
            return Err(WarpError::unsupported_input(format!(
                "Cannot build a grid of shape {:?}",
                shape
            )));
        }

        let ndim = shape.len();
        let total = num_elements(shape);
        let strides = strides(shape);

        let mut values = Vec::with_capacity(ndim * total);
        for (axis, &n) in shape.iter().enumerate() {
            let stride = strides[axis];
            values.extend((0..total).map(|p| ((p / stride) % n) as f64 / n as f64).map(|v| v as f32));
        }

        Ok(Self {
            coordinates: from_host(values, [ndim, total], device),
            shape: shape.to_vec(),
        })
    }

    /// Wrap precomputed coordinates `[ndim, N]` for a grid of the given shape.
    pub fn from_coordinates(coordinates: Tensor<B, 2>, shape: &[usize]) -> Result<Self> {
        let dims = coordinates.dims();
        let expected = [shape.len(), num_elements(shape)];
        if dims != expected {
            return Err(WarpError::shape_mismatch(expected.to_vec(), dims.to_vec()));
        }
        Ok(Self {
            coordinates,
            shape: shape.to_vec(),
        })
    }

    /// Wrap an `[ndim, N1, ..., Nndim]` coordinate array.
    pub fn from_tensor<const R: usize>(grid: Tensor<B, R>) -> Result<Self> {
        let dims = grid.dims();
        if R < 2 || dims[0] != R - 1 {
            let mut expected = dims.to_vec();
            expected[0] = R.saturating_sub(1);
            return Err(WarpError::shape_mismatch(expected, dims.to_vec()));
        }
        let shape = dims[1..].to_vec();
        let coordinates = grid.reshape([R - 1, num_elements(&shape)]);
        Self::from_coordinates(coordinates, &shape)
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of points in the grid.
    pub fn len(&self) -> usize {
        num_elements(&self.shape)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the coordinates `[ndim, N]`.
    pub fn coordinates(&self) -> Tensor<B, 2> {
        self.coordinates.clone()
    }

    /// Get the coordinates as an `[ndim, N1, ..., Nndim]` tensor.
    pub fn to_tensor<const R: usize>(&self) -> Result<Tensor<B, R>> {
        let mut dims = vec![self.ndim()];
        dims.extend_from_slice(&self.shape);
        let dims = crate::tensor::fixed_shape::<R>(&dims)?;
        Ok(self.coordinates.clone().reshape(dims))
    }

    /// Read the coordinates back into a row-major `[ndim, N]` buffer.
    pub fn to_host(&self) -> Result<Vec<f32>> {
        to_host(self.coordinates.clone())
    }

    /// Coordinate along `axis` of the point at multi-index `index`.
    pub fn value(&self, axis: usize, index: &[usize]) -> Result<f32> {
        if axis >= self.ndim() {
            return Err(WarpError::unsupported_input(format!(
                "Axis {} is out of range for a {}D grid",
                axis,
                self.ndim()
            )));
        }
        if index.len() != self.ndim() {
            return Err(WarpError::dimension_mismatch(self.ndim(), index.len()));
        }
        if index.iter().zip(&self.shape).any(|(&i, &n)| i >= n) {
            return Err(WarpError::shape_mismatch(self.shape.clone(), index.to_vec()));
        }
        let flat: usize = index.iter().zip(strides(&self.shape)).map(|(&i, s)| i * s).sum();
        let point = self
            .coordinates
            .clone()
            .narrow(0, axis, 1)
            .narrow(1, flat, 1);
        Ok(to_host(point)?[0])
    }

    /// Scale the grid per axis, for example to fit an image size.
    ///
    /// # Errors
    /// `DimensionMismatch` if `size` does not have one entry per axis.
    pub fn scaled_to(&self, size: &[usize]) -> Result<Self> {
        if size.len() != self.ndim() {
            return Err(WarpError::dimension_mismatch(self.ndim(), size.len()));
        }
        let factors: Vec<f32> = size.iter().map(|&s| s as f32).collect();
        let factors = from_host::<B, 2>(factors, [size.len(), 1], &self.coordinates.device());
        Ok(Self {
            coordinates: self.coordinates.clone() * factors,
            shape: self.shape.clone(),
        })
    }

    /// Transform the grid with one or more transforms, leftmost first.
    pub fn transform(&self, transforms: &[&dyn Transform<B>]) -> Result<Self> {
        let coordinates = transforms
            .iter()
            .try_fold(self.coordinates.clone(), |points, t| t.transform(points, None))?;
        Ok(Self {
            coordinates,
            shape: self.shape.clone(),
        })
    }

    /// Jacobian of the transformed grid, in units of grid samples.
    ///
    /// Entry `[i, j, p]` is the forward difference of output component `i`
    /// along axis `j` at point `p`. The last sample along each axis repeats
    /// the preceding difference.
    ///
    /// # Errors
    /// `UnsupportedInput` if an axis has a single sample.
    pub fn jacobian(&self, transforms: &[&dyn Transform<B>]) -> Result<Tensor<B, 3>> {
        let ndim = self.ndim();
        let total = self.len();
        let jacobian = self.jacobian_host(transforms)?;
        Ok(from_host(jacobian, [ndim, ndim, total], &self.coordinates.device()))
    }

    /// Determinant of the Jacobian at every grid point, shape `[N]`.
    ///
    /// Values below zero indicate folding.
    pub fn jacobian_det(&self, transforms: &[&dyn Transform<B>]) -> Result<Tensor<B, 1>> {
        let ndim = self.ndim();
        let total = self.len();
        let jacobian = self.jacobian_host(transforms)?;

        let det: Vec<f32> = (0..total)
            .map(|p| {
                DMatrix::from_fn(ndim, ndim, |i, j| f64::from(jacobian[(i * ndim + j) * total + p]))
                    .determinant() as f32
            })
            .collect();

        let (min, max) = det
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| (lo.min(d), hi.max(d)));
        tracing::debug!("Jacobian determinant range [{:.4}, {:.4}] over {} points", min, max, total);

        Ok(from_host(det, [total], &self.coordinates.device()))
    }

    fn jacobian_host(&self, transforms: &[&dyn Transform<B>]) -> Result<Vec<f32>> {
        if let Some(axis) = self.shape.iter().position(|&n| n < 2) {
            return Err(WarpError::unsupported_input(format!(
                "Cannot differentiate along axis {} of length {}",
                axis, self.shape[axis]
            )));
        }

        let ndim = self.ndim();
        let total = self.len();
        let strides = strides(&self.shape);
        let warped = self.transform(transforms)?.scaled_to(&self.shape)?.to_host()?;

        let mut jacobian = vec![0.0f32; ndim * ndim * total];
        for i in 0..ndim {
            let component = &warped[i * total..(i + 1) * total];
            for (j, (&stride, &n)) in strides.iter().zip(&self.shape).enumerate() {
                let out = &mut jacobian[(i * ndim + j) * total..(i * ndim + j + 1) * total];
                for (p, value) in out.iter_mut().enumerate() {
                    let index = (p / stride) % n;
                    *value = if index + 1 < n {
                        component[p + stride] - component[p]
                    } else {
                        component[p] - component[p - stride]
                    };
                }
            }
        }
        Ok(jacobian)
    }
}

impl<B: Backend> fmt::Display for Grid<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size: Vec<String> = self.shape.iter().map(ToString::to_string).collect();
        write!(f, "Grid({}D, {})", self.ndim(), size.join("x"))
    }
}
