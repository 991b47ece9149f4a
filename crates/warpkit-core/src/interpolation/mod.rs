//! Interpolation types and operations.
//!
//! This module provides interpolation traits and implementations
//! for sampling values at continuous coordinates.

pub mod trait_;
pub mod config;
pub mod spline;
pub mod bspline;
pub mod linear;
pub mod multichannel;

pub use trait_::Interpolator;
pub use config::{BoundaryMode, ChannelAxis, InterpolatorConfig, SampleOptions};
pub use spline::SplineCoefficients;
pub use bspline::BSplineInterpolator;
pub use linear::LinearInterpolator;
pub use multichannel::MultiChannelInterpolator;
