//! Transform trait for spatial coordinate transformations.
//!
//! This module defines the core Transform trait that all spatial transforms must implement.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::tensor::from_host;

/// Transform trait for spatial coordinate transformations.
///
/// Maps point sets from one spatial domain to another. Point sets are
/// tensors of shape `[ndim, N]`, one column per point, expressed in the
/// normalized `[0, 1)` domain of each axis.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub trait Transform<B: Backend>: fmt::Debug + fmt::Display {
    /// Number of spatial dimensions this transform operates on.
    fn ndim(&self) -> usize;

    /// Apply the transform to points in the `[0, 1)` domain.
    ///
    /// Callers go through [`Transform::transform`], which has already checked
    /// that `points` has `self.ndim()` rows.
    fn transform_points(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>>;

    /// Apply the transform to a point set, optionally expressed in other units.
    ///
    /// # Arguments
    /// * `points` - Tensor of shape `[ndim, N]`
    /// * `scale` - Per-axis factors relating the units of `points` to the
    ///   `[0, 1)` domain. Points are divided by `scale` before the transform
    ///   and the result is multiplied back. `None` means unit scale.
    ///
    /// # Errors
    /// `DimensionMismatch` if the leading axis of `points` (or the length of
    /// `scale`) differs from `self.ndim()`.
    fn transform(&self, points: Tensor<B, 2>, scale: Option<&[f32]>) -> Result<Tensor<B, 2>> {
        let [rows, _] = points.dims();
        check_dimensions(self.ndim(), rows)?;

        match scale {
            None => self.transform_points(points),
            Some(scale) => {
                check_dimensions(self.ndim(), scale.len())?;
                let factors = from_host::<B, 2>(scale.to_vec(), [scale.len(), 1], &points.device());
                let unit_points = points / factors.clone();
                Ok(self.transform_points(unit_points)? * factors)
            }
        }
    }
}

/// Validate that `actual` points dimensions match a transform of `expected` dimensions.
pub fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(WarpError::dimension_mismatch(expected, actual));
    }
    Ok(())
}
