//! Composed transform implementation.
//!
//! This module chains any number of transforms of equal dimensionality.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use super::trait_::Transform;

/// Composed Transform.
///
/// Applies transforms in sequence, leftmost first:
/// `y = Tn(...T2(T1(x)))` for `[T1, T2, ..., Tn]`.
#[derive(Debug)]
pub struct ComposedTransform<B: Backend> {
    transforms: Vec<Box<dyn Transform<B>>>,
}

impl<B: Backend> ComposedTransform<B> {
    /// Create a new composed transform.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `transforms` is empty or the transforms
    /// disagree on their number of dimensions.
    pub fn new(transforms: Vec<Box<dyn Transform<B>>>) -> Result<Self> {
        let Some(first) = transforms.first() else {
            return Err(WarpError::invalid_configuration("Cannot compose zero transforms"));
        };
        let ndim = first.ndim();
        if let Some(other) = transforms.iter().find(|t| t.ndim() != ndim) {
            return Err(WarpError::invalid_configuration(format!(
                "Cannot compose {}D and {}D transforms",
                ndim,
                other.ndim()
            )));
        }
        tracing::debug!("Composed {} {}D transforms", transforms.len(), ndim);
        Ok(Self { transforms })
    }

    /// The transforms in application order.
    pub fn transforms(&self) -> &[Box<dyn Transform<B>>] {
        &self.transforms
    }
}

impl<B: Backend> Transform<B> for ComposedTransform<B> {
    fn ndim(&self) -> usize {
        self.transforms[0].ndim()
    }

    fn transform_points(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        self.transforms
            .iter()
            .try_fold(points, |points, transform| transform.transform(points, None))
    }
}

impl<B: Backend> fmt::Display for ComposedTransform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Composed({}D, ", self.ndim())?;
        for (i, transform) in self.transforms.iter().enumerate() {
            if i > 0 {
                f.write_str("∘")?;
            }
            write!(f, "{}", transform)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::to_host;
    use crate::transform::affine::{AffineParams, AffineTransform};
    use crate::transform::translation::TranslationTransform;
    use burn_ndarray::NdArray;
    use std::f64::consts::FRAC_PI_2;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_composed_applies_leftmost_first() {
        let device = Default::default();

        // Translate by [1, 0], then rotate by 90 degrees about the origin
        let translate = TranslationTransform::<TestBackend>::from_slice(&[1.0, 0.0], &device).unwrap();
        let rotate =
            AffineTransform::<TestBackend>::new(2, AffineParams::new().angles([FRAC_PI_2]), &device).unwrap();
        let composed = ComposedTransform::new(vec![Box::new(translate), Box::new(rotate)]).unwrap();

        // [0, 0] -> [1, 0] -> [0, 1]
        let points = Tensor::<TestBackend, 2>::zeros([2, 1], &device);
        let data = to_host(composed.transform(points, None).unwrap()).unwrap();

        assert!(data[0].abs() < 1e-6);
        assert!((data[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_composed_rejects_empty_and_mixed() {
        let device = Default::default();
        assert!(matches!(
            ComposedTransform::<TestBackend>::new(Vec::new()),
            Err(WarpError::InvalidConfiguration(_))
        ));

        let t2 = TranslationTransform::<TestBackend>::from_slice(&[0.0, 0.0], &device).unwrap();
        let t3 = TranslationTransform::<TestBackend>::from_slice(&[0.0, 0.0, 0.0], &device).unwrap();
        assert!(matches!(
            ComposedTransform::new(vec![Box::new(t2), Box::new(t3)]),
            Err(WarpError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_display() {
        let device = Default::default();
        let t = TranslationTransform::<TestBackend>::from_slice(&[1.0, 0.0], &device).unwrap();
        let a = AffineTransform::<TestBackend>::identity(2, &device).unwrap();
        let composed = ComposedTransform::new(vec![Box::new(t), Box::new(a)]).unwrap();
        assert_eq!(composed.to_string(), "Composed(2D, Translation(2D, t=[1.0, 0.0])∘Affine(2D))");
    }
}
