//! Linear interpolation implementation.
//!
//! This module provides bilinear and trilinear interpolation computed with
//! tensor operations on the backend.

use std::fmt;
use burn::tensor::{Int, Tensor};
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::image::Grid;
use super::config::SampleOptions;
use super::trait_::{check_points, Interpolator};

/// Linear Interpolator.
///
/// Performs linear interpolation (bilinear for 2D, trilinear for 3D) with
/// corner indices clamped to the image. A point that falls past the last
/// sample of an axis collapses both corners onto the edge and samples to
/// zero, so the image border reads as empty. Boundary modes, orders and
/// fill values do not apply; passing any of them logs a warning.
#[derive(Debug, Clone)]
pub struct LinearInterpolator<B: Backend, const D: usize> {
    image: Tensor<B, D>,
    grid: Grid<B>,
}

impl<B: Backend, const D: usize> LinearInterpolator<B, D> {
    /// Create a new linear interpolator.
    ///
    /// # Errors
    /// `UnsupportedInput` unless the image is 2D or 3D.
    pub fn new(image: Tensor<B, D>) -> Result<Self> {
        if D != 2 && D != 3 {
            return Err(WarpError::unsupported_input(format!(
                "Image should be a 2D or 3D array, got {}D",
                D
            )));
        }
        let grid = Grid::new(&image.dims(), &image.device())?;
        Ok(Self { image, grid })
    }

    /// Create a new linear interpolator, warning about options it cannot honor.
    pub fn with_options(image: Tensor<B, D>, options: &SampleOptions) -> Result<Self> {
        warn_ignored(options);
        Self::new(image)
    }

    pub fn image(&self) -> Tensor<B, D> {
        self.image.clone()
    }

    fn sample_2d(&self, points: Tensor<B, 2>) -> Tensor<B, 1> {
        let [nx, ny] = [self.shape()[0], self.shape()[1]];
        let x = points.clone().narrow(0, 0, 1).squeeze::<1>(0);
        let y = points.narrow(0, 1, 1).squeeze::<1>(0);

        let (x0, x1) = corners(x.clone(), nx);
        let (y0, y1) = corners(y.clone(), ny);

        // Weights use the clamped corners
        let wx0 = x1.clone() - x.clone();
        let wx1 = x - x0.clone();
        let wy0 = y1.clone() - y.clone();
        let wy1 = y - y0.clone();

        let (x0, x1, y0, y1) = (x0.int(), x1.int(), y0.int(), y1.int());
        let flat_data = self.image.clone().reshape([nx * ny]);
        let stride_x = ny as i32;

        let v00 = gather_2d(&flat_data, &x0, &y0, stride_x);
        let v10 = gather_2d(&flat_data, &x1, &y0, stride_x);
        let v01 = gather_2d(&flat_data, &x0, &y1, stride_x);
        let v11 = gather_2d(&flat_data, &x1, &y1, stride_x);

        wx0.clone() * wy0.clone() * v00
            + wx1.clone() * wy0 * v10
            + wx0 * wy1.clone() * v01
            + wx1 * wy1 * v11
    }

    fn sample_3d(&self, points: Tensor<B, 2>) -> Tensor<B, 1> {
        let [nx, ny, nz] = [self.shape()[0], self.shape()[1], self.shape()[2]];
        let x = points.clone().narrow(0, 0, 1).squeeze::<1>(0);
        let y = points.clone().narrow(0, 1, 1).squeeze::<1>(0);
        let z = points.narrow(0, 2, 1).squeeze::<1>(0);

        let (x0, x1) = corners(x.clone(), nx);
        let (y0, y1) = corners(y.clone(), ny);
        let (z0, z1) = corners(z.clone(), nz);

        let wx = [x1.clone() - x.clone(), x - x0.clone()];
        let wy = [y1.clone() - y.clone(), y - y0.clone()];
        let wz = [z1.clone() - z.clone(), z - z0.clone()];

        let xi = [x0.int(), x1.int()];
        let yi = [y0.int(), y1.int()];
        let zi = [z0.int(), z1.int()];

        let flat_data = self.image.clone().reshape([nx * ny * nz]);
        let stride_x = (ny * nz) as i32;
        let stride_y = nz as i32;

        let mut result: Option<Tensor<B, 1>> = None;
        for a in 0..2 {
            for b in 0..2 {
                for c in 0..2 {
                    let idx = xi[a].clone() * stride_x + yi[b].clone() * stride_y + zi[c].clone();
                    let term = wx[a].clone() * wy[b].clone() * wz[c].clone() * flat_data.clone().gather(0, idx);
                    result = Some(match result {
                        Some(acc) => acc + term,
                        None => term,
                    });
                }
            }
        }
        // Eight corners are always visited
        result.unwrap_or_else(|| Tensor::zeros([0], &flat_data.device()))
    }
}

/// Floor and ceiling corner coordinates, clamped to `[0, n - 1]`.
fn corners<B: Backend>(coordinate: Tensor<B, 1>, n: usize) -> (Tensor<B, 1>, Tensor<B, 1>) {
    let lower = coordinate.floor();
    let upper = lower.clone() + 1.0;
    let last = (n - 1) as f64;
    (lower.clamp(0.0, last), upper.clamp(0.0, last))
}

#[inline]
fn gather_2d<B: Backend>(
    flat_data: &Tensor<B, 1>,
    xi: &Tensor<B, 1, Int>,
    yi: &Tensor<B, 1, Int>,
    stride_x: i32,
) -> Tensor<B, 1> {
    let idx = xi.clone() * stride_x + yi.clone();
    flat_data.clone().gather(0, idx)
}

fn warn_ignored(options: &SampleOptions) {
    if !options.is_empty() {
        tracing::warn!("LinearInterpolator ignored options: {:?}", options);
    }
}

impl<B: Backend, const D: usize> Interpolator<B, D> for LinearInterpolator<B, D> {
    fn shape(&self) -> [usize; D] {
        self.image.dims()
    }

    fn grid(&self) -> &Grid<B> {
        &self.grid
    }

    fn sample(&self, points: Tensor<B, 2>, options: &SampleOptions) -> Result<Tensor<B, 1>> {
        check_points::<B, D>(&points)?;
        warn_ignored(options);
        match D {
            2 => Ok(self.sample_2d(points)),
            _ => Ok(self.sample_3d(points)),
        }
    }
}

impl<B: Backend, const D: usize> fmt::Display for LinearInterpolator<B, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinearInterpolator({}D)", D)
    }
}
