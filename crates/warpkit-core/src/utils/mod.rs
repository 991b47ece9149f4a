//! Helpers for building inputs and showing outputs.
//!
//! None of these are needed to transform or interpolate; they generate test
//! images and displacement fields and map fields onto plot settings.

pub mod display;
pub mod phantom;
pub mod random;

pub use display::DisplayOptions;
pub use phantom::phantom_image;
pub use random::{max_no_fold, uniform_field};
