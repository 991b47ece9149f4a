//! Plot settings for displacement fields.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::tensor::to_host;

/// Color map settings that show a displacement field as blue-white-red,
/// with zero displacement in white.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub cmap: String,
    pub vmin: f32,
    pub vmax: f32,
}

impl DisplayOptions {
    /// Settings symmetric about zero that cover every value.
    pub fn for_values(values: &[f32]) -> Self {
        let bound = values.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
        Self {
            cmap: "bwr".to_string(),
            vmin: -bound,
            vmax: bound,
        }
    }

    /// Settings for a displacement field tensor.
    pub fn for_field<B: Backend, const D: usize>(field: Tensor<B, D>) -> Result<Self> {
        Ok(Self::for_values(&to_host(field)?))
    }
}
