//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation methods must implement.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::image::Grid;
use crate::tensor::fixed_shape;
use crate::transform::trait_::check_dimensions;
use crate::transform::Transform;
use super::config::SampleOptions;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// An interpolator wraps one `D`-dimensional image. Points passed to
/// [`Interpolator::sample`] are in index space (`0` to `n - 1` along each
/// axis); grids passed to [`Interpolator::resample`] are in the `[0, 1)`
/// domain and get scaled to the image shape first.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `D` - The image dimensionality
pub trait Interpolator<B: Backend, const D: usize>: fmt::Debug + fmt::Display {
    /// Shape of the wrapped image.
    fn shape(&self) -> [usize; D];

    /// The image's own sampling grid.
    fn grid(&self) -> &Grid<B>;

    /// Sample the image at points given in index space.
    ///
    /// # Arguments
    /// * `points` - Tensor of shape `[D, N]`
    /// * `options` - Per-call overrides of the interpolator defaults
    ///
    /// # Returns
    /// Tensor of sampled values `[N]`
    fn sample(&self, points: Tensor<B, 2>, options: &SampleOptions) -> Result<Tensor<B, 1>>;

    /// Resample the image on a grid, returning an array of the grid's shape.
    fn resample(&self, grid: &Grid<B>, options: &SampleOptions) -> Result<Tensor<B, D>> {
        let scaled = grid.scaled_to(&self.shape())?;
        tracing::debug!("Resampling {} on {}", self, grid);
        let values = self.sample(scaled.coordinates(), options)?;
        Ok(values.reshape(fixed_shape::<D>(grid.shape())?))
    }

    /// Warp the image by transforming its own grid and resampling.
    fn transform(&self, transforms: &[&dyn Transform<B>], options: &SampleOptions) -> Result<Tensor<B, D>> {
        let warped = self.grid().transform(transforms)?;
        self.resample(&warped, options)
    }
}

/// Validate that a `[rows, N]` point set matches a `D`-dimensional image.
pub fn check_points<B: Backend, const D: usize>(points: &Tensor<B, 2>) -> Result<()> {
    check_dimensions(D, points.dims()[0])
}
