//! Geometric transformations of N-dimensional images.
//!
//! Transforms map point sets in the normalized `[0, 1)` domain, grids carry
//! those points for every sample of an image, and interpolators resample
//! images on transformed grids.
//!
//! ```ignore
//! use std::f64::consts::FRAC_PI_4;
//! use warpkit_core::prelude::*;
//!
//! let rotation = AffineTransform::<B>::new(2, AffineParams::new().angles([FRAC_PI_4]).center_of(&[64, 64]), &device)?;
//! let interpolator = BSplineInterpolator::new(image)?;
//! let warped = interpolator.transform(&[&rotation], &SampleOptions::new())?;
//! ```

pub mod error;
pub mod tensor;
pub mod transform;
pub mod image;
pub mod interpolation;
pub mod utils;

pub use error::{Result, WarpError};
pub use image::Grid;
pub use transform::{
    AffineParams, AffineTransform, BSplineTransform, ComposedTransform, LinearTransform, Transform,
    TranslationTransform,
};
pub use interpolation::{
    BSplineInterpolator, BoundaryMode, ChannelAxis, Interpolator, InterpolatorConfig, LinearInterpolator,
    MultiChannelInterpolator, SampleOptions,
};

/// Common imports.
pub mod prelude {
    pub use crate::error::{Result, WarpError};
    pub use crate::image::Grid;
    pub use crate::interpolation::{
        BSplineInterpolator, BoundaryMode, ChannelAxis, Interpolator, InterpolatorConfig, LinearInterpolator,
        MultiChannelInterpolator, SampleOptions,
    };
    pub use crate::transform::{
        center_of, AffineParams, AffineTransform, BSplineTransform, ComposedTransform, LinearTransform, Transform,
        TranslationTransform,
    };
}
