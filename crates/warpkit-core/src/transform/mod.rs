//! Transform types and operations.
//!
//! This module provides the transform trait and its implementations
//! for mapping point sets in the normalized `[0, 1)` domain.

pub mod trait_;
pub mod translation;
pub mod linear;
pub mod affine;
pub mod bspline;
pub mod composed;

pub use trait_::Transform;
pub use translation::TranslationTransform;
pub use linear::LinearTransform;
pub use affine::{center_of, AffineParams, AffineTransform};
pub use bspline::BSplineTransform;
pub use composed::ComposedTransform;
