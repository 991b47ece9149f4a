//! Host/device conversion helpers.
//!
//! Spline evaluation and finite differencing run on host `f32` buffers; these
//! helpers move data between those buffers and backend tensors.

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use crate::error::{Result, WarpError};

/// Read a tensor back into a row-major `f32` buffer.
pub fn to_host<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| WarpError::data(format!("{e:?}")))
}

/// Build a tensor from a row-major `f32` buffer.
pub fn from_host<B: Backend, const D: usize>(
    values: Vec<f32>,
    shape: [usize; D],
    device: &B::Device,
) -> Tensor<B, D> {
    Tensor::from_data(TensorData::new(values, shape), device)
}

/// Convert a dynamic shape into a const-rank one.
pub fn fixed_shape<const D: usize>(shape: &[usize]) -> Result<[usize; D]> {
    shape
        .try_into()
        .map_err(|_| WarpError::dimension_mismatch(D, shape.len()))
}

/// Number of elements in a row-major array of the given shape.
pub fn num_elements(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major strides for the given shape.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_host_roundtrip_preserves_layout() {
        let device = Default::default();
        let tensor = from_host::<TestBackend, 2>(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3], &device);
        assert_eq!(tensor.dims(), [2, 3]);
        assert_eq!(to_host(tensor).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_strides() {
        assert_eq!(strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(strides(&[7]), vec![1]);
        assert!(strides(&[]).is_empty());
    }

    #[test]
    fn test_fixed_shape_rejects_wrong_rank() {
        assert_eq!(fixed_shape::<2>(&[4, 5]).unwrap(), [4, 5]);
        assert!(matches!(
            fixed_shape::<3>(&[4, 5]),
            Err(WarpError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
