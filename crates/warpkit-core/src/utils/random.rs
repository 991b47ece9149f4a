//! Random displacement fields.

use burn::tensor::{Distribution, Tensor};
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::tensor::{from_host, num_elements};

/// Field of shape `[ndim, ...]` whose component `i` is uniform in
/// `[-scale[i], scale[i])`.
///
/// Draws from the backend generator; seed it with `B::seed` for
/// reproducible fields.
pub fn uniform_field<B: Backend, const R: usize>(
    scale: &[f32],
    shape: [usize; R],
    device: &B::Device,
) -> Result<Tensor<B, R>> {
    if R == 0 || scale.len() != shape[0] {
        return Err(WarpError::dimension_mismatch(shape.first().copied().unwrap_or(0), scale.len()));
    }

    let components = shape[0];
    let rest = num_elements(&shape[1..]);
    let unit = Tensor::<B, 2>::random([components, rest], Distribution::Uniform(-1.0, 1.0), device);
    let factors = from_host::<B, 2>(scale.to_vec(), [components, 1], device);

    Ok((unit * factors).reshape(shape))
}

/// Random B-spline control grid with the largest displacements that cannot fold.
///
/// `shape` is `[ndim, N1, ..., Nndim]`; component `i` is bounded by
/// `0.5 / (4 (N_i - 1))`.
pub fn max_no_fold<B: Backend, const R: usize>(shape: [usize; R], device: &B::Device) -> Result<Tensor<B, R>> {
    if R < 2 || shape[0] != R - 1 {
        return Err(WarpError::invalid_configuration(format!(
            "Control grid shape {:?} should start with its number of spatial axes",
            shape
        )));
    }
    if shape[1..].iter().any(|&n| n < 2) {
        return Err(WarpError::invalid_configuration("Control grid axes need at least two points"));
    }
    let scale: Vec<f32> = shape[1..].iter().map(|&n| 0.5 / (4.0 * (n - 1) as f32)).collect();
    uniform_field(&scale, shape, device)
}
