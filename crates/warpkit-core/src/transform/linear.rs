//! Linear transform on augmented (homogeneous) coordinates.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::tensor::from_host;
use super::trait_::Transform;

/// Linear Transform in homogeneous coordinates.
///
/// Holds an augmented `[ndim, ndim + 1]` matrix `M = [A | t]` and computes
/// `y = A x + t` for every point. Works for any number of dimensions.
#[derive(Debug, Clone)]
pub struct LinearTransform<B: Backend> {
    matrix: Tensor<B, 2>, // [ndim, ndim + 1]
}

impl<B: Backend> LinearTransform<B> {
    /// Create a new linear transform.
    ///
    /// # Arguments
    /// * `matrix` - Tensor of shape `[ndim, ndim + 1]` containing the augmented matrix
    ///
    /// # Errors
    /// `InvalidConfiguration` if the matrix is not shaped `[ndim, ndim + 1]`.
    pub fn new(matrix: Tensor<B, 2>) -> Result<Self> {
        let [rows, cols] = matrix.dims();
        if rows == 0 || cols != rows + 1 {
            return Err(WarpError::invalid_configuration(format!(
                "Incorrect matrix shape, should be (ndim) x (ndim + 1), is {}x{}",
                rows, cols
            )));
        }
        tracing::debug!("Created {}D linear transform", rows);
        Ok(Self { matrix })
    }

    /// Create a linear transform from row-major matrix values.
    pub fn from_rows(rows: &[Vec<f32>], device: &B::Device) -> Result<Self> {
        let ndim = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(WarpError::invalid_configuration("Matrix rows differ in length"));
        }
        let values: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::new(from_host(values, [ndim, cols], device))
    }

    /// Get the augmented transformation matrix.
    pub fn matrix(&self) -> Tensor<B, 2> {
        self.matrix.clone()
    }
}

impl<B: Backend> Transform<B> for LinearTransform<B> {
    fn ndim(&self) -> usize {
        self.matrix.dims()[0]
    }

    fn transform_points(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        // [ndim, ndim + 1] x [ndim + 1, N] -> [ndim, N]
        let [_, n] = points.dims();
        let ones = Tensor::<B, 2>::ones([1, n], &points.device());
        let augmented = Tensor::cat(vec![points, ones], 0);
        Ok(self.matrix.clone().matmul(augmented))
    }
}

impl<B: Backend> fmt::Display for LinearTransform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Linear({}D)", self.ndim())
    }
}
