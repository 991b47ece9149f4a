//! Grid-line phantom images.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::tensor::{from_host, num_elements, strides};

/// Image of lines `thickness` samples wide, repeated every `spacing` samples
/// along every axis, starting at `offset`. Lines are 1, background is 0.
pub fn phantom_image<B: Backend, const D: usize>(
    shape: [usize; D],
    spacing: usize,
    thickness: usize,
    offset: usize,
    device: &B::Device,
) -> Result<Tensor<B, D>> {
    if spacing == 0 {
        return Err(WarpError::invalid_configuration("Phantom line spacing must be positive"));
    }

    let on_line = |index: usize| (0..thickness).any(|t| index >= offset + t && (index - offset - t) % spacing == 0);
    let strides = strides(&shape);
    let values = (0..num_elements(&shape))
        .map(|p| {
            let hit = strides
                .iter()
                .zip(&shape)
                .any(|(&stride, &n)| on_line((p / stride) % n));
            if hit {
                1.0
            } else {
                0.0
            }
        })
        .collect();

    Ok(from_host(values, shape, device))
}
