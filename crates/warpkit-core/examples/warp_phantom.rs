//! Warp Phantom Example
//!
//! Deforms a grid-line phantom with a small rotation followed by a random
//! B-spline deformation that cannot fold, then reports the range of the
//! Jacobian determinant over the warped grid.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -p warpkit-core --example warp_phantom

use std::f64::consts::PI;
use burn_ndarray::NdArray;
use warpkit_core::prelude::*;
use warpkit_core::tensor::to_host;
use warpkit_core::utils::{max_no_fold, phantom_image, DisplayOptions};

type Backend = NdArray<f32>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let device = Default::default();
    let shape = [128, 128];

    let image = phantom_image::<Backend, 2>(shape, 16, 2, 8, &device)?;
    let config = InterpolatorConfig::default().with_mode(BoundaryMode::Mirror);
    let interpolator = BSplineInterpolator::with_config(image, config)?;

    let rotation = AffineTransform::<Backend>::new(
        2,
        AffineParams::new().angles([PI / 12.0]).center_of(&shape),
        &device,
    )?;
    let bspline = BSplineTransform::new(max_no_fold::<Backend, 3>([2, 6, 6], &device)?)?;
    tracing::info!("Warping {}x{} phantom with {} then {}", shape[0], shape[1], rotation, bspline);

    let warped = interpolator.transform(&[&rotation, &bspline], &SampleOptions::new())?;
    tracing::info!("Warped image shape {:?}", warped.dims());

    let grid = interpolator.grid();
    let displacement = grid.transform(&[&bspline])?.coordinates() - grid.coordinates();
    let display_opts = DisplayOptions::for_field(displacement)?;
    tracing::info!("B-spline displacement within [{:.4}, {:.4}], cmap {}", display_opts.vmin, display_opts.vmax, display_opts.cmap);

    let det = to_host(grid.jacobian_det(&[&rotation, &bspline])?)?;
    let (lo, hi) = det
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| (lo.min(d), hi.max(d)));
    tracing::info!("Jacobian determinant range [{:.4}, {:.4}]", lo, hi);
    if lo <= 0.0 {
        tracing::warn!("Deformation folds: minimum determinant {:.4}", lo);
    }

    Ok(())
}
