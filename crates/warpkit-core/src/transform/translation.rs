//! Translation transform implementation.
//!
//! This module provides a simple translation transform.

use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::tensor::{from_host, to_host};
use super::trait_::Transform;

/// Simple Translation Transform.
///
/// Translates points by a fixed offset vector, expressed as a fraction of
/// the `[0, 1)` domain along each axis.
#[derive(Debug, Clone)]
pub struct TranslationTransform<B: Backend> {
    translation: Tensor<B, 1>,
}

impl<B: Backend> TranslationTransform<B> {
    /// Create a new translation transform.
    ///
    /// # Arguments
    /// * `translation` - Tensor of shape `[ndim]` containing the translation vector
    pub fn new(translation: Tensor<B, 1>) -> Result<Self> {
        let [ndim] = translation.dims();
        if ndim == 0 {
            return Err(WarpError::invalid_configuration(
                "Translation vector must have at least one component",
            ));
        }
        tracing::debug!("Created {}D translation transform", ndim);
        Ok(Self { translation })
    }

    /// Create a translation transform from a slice of offsets.
    pub fn from_slice(translation: &[f32], device: &B::Device) -> Result<Self> {
        Self::new(from_host(translation.to_vec(), [translation.len()], device))
    }

    /// Get the translation vector.
    pub fn translation(&self) -> Tensor<B, 1> {
        self.translation.clone()
    }
}

impl<B: Backend> Transform<B> for TranslationTransform<B> {
    fn ndim(&self) -> usize {
        self.translation.dims()[0]
    }

    fn transform_points(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        // points: [ndim, N], broadcast translation as a column
        let t = self.translation.clone().reshape([self.ndim(), 1]);
        Ok(points + t)
    }
}

impl<B: Backend> fmt::Display for TranslationTransform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Translation({}D, t=", self.ndim())?;
        match to_host(self.translation.clone()) {
            Ok(values) => write!(f, "{:?})", values),
            Err(_) => write!(f, "?)"),
        }
    }
}
