//! Error types for transformation, grid and interpolation operations.
//!
//! Every failure in this crate is detected synchronously and returned to the
//! caller; nothing is retried or recovered internally.

use thiserror::Error;

/// Main error type for warpkit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WarpError {
    /// A point set or size argument has the wrong number of dimensions.
    #[error("Dimension mismatch: {actual}D input cannot be used with {expected}D operand")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// An array has the wrong shape.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Invalid option or construction parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input that the selected engine cannot handle.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Tensor data could not be read back from the backend.
    #[error("Tensor data error: {0}")]
    Data(String),
}

/// Result type for warpkit operations.
pub type Result<T> = std::result::Result<T, WarpError>;

impl WarpError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: impl Into<Vec<usize>>, actual: impl Into<Vec<usize>>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an unsupported input error.
    pub fn unsupported_input(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    /// Create a tensor data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }
}
