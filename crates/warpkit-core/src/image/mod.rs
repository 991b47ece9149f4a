//! Sampling grids.
//!
//! This module provides the [`Grid`] type used to resample images and to
//! measure the local deformation of transforms.

pub mod grid;

pub use grid::Grid;
