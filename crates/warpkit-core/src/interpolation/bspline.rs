//! B-Spline interpolation implementation.
//!
//! This module provides B-Spline interpolation of orders 0 to 5 for smooth
//! sampling of image values at continuous coordinates.

use std::borrow::Cow;
use std::fmt;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::image::Grid;
use crate::tensor::{from_host, to_host};
use super::config::{InterpolatorConfig, SampleOptions};
use super::spline::SplineCoefficients;
use super::trait_::{check_points, Interpolator};

/// B-Spline interpolator.
///
/// Wraps an image of any rank. Coefficients for the construction-time
/// order and boundary mode are computed once; a sample that overrides
/// them prefilters again for that call.
#[derive(Debug, Clone)]
pub struct BSplineInterpolator<B: Backend, const D: usize> {
    image: Tensor<B, D>,
    samples: Vec<f32>,
    config: InterpolatorConfig,
    coefficients: SplineCoefficients,
    grid: Grid<B>,
}

impl<B: Backend, const D: usize> BSplineInterpolator<B, D> {
    /// Create a new cubic interpolator with constant (zero) boundaries.
    pub fn new(image: Tensor<B, D>) -> Result<Self> {
        Self::with_config(image, InterpolatorConfig::default())
    }

    /// Create a new interpolator with explicit defaults.
    pub fn with_config(image: Tensor<B, D>, config: InterpolatorConfig) -> Result<Self> {
        config.validate()?;
        let shape = image.dims();
        let samples = to_host(image.clone())?;
        let coefficients = SplineCoefficients::new(&samples, &shape, config.order, config.mode)?;
        let grid = Grid::new(&shape, &image.device())?;

        tracing::debug!(
            "Created {}D B-spline interpolator, order {}, mode {}",
            D,
            config.order,
            config.mode
        );

        Ok(Self {
            image,
            samples,
            config,
            coefficients,
            grid,
        })
    }

    pub fn image(&self) -> Tensor<B, D> {
        self.image.clone()
    }

    pub fn config(&self) -> &InterpolatorConfig {
        &self.config
    }
}

impl<B: Backend, const D: usize> Interpolator<B, D> for BSplineInterpolator<B, D> {
    fn shape(&self) -> [usize; D] {
        self.image.dims()
    }

    fn grid(&self) -> &Grid<B> {
        &self.grid
    }

    fn sample(&self, points: Tensor<B, 2>, options: &SampleOptions) -> Result<Tensor<B, 1>> {
        check_points::<B, D>(&points)?;
        let config = options.resolve(&self.config)?;

        let coefficients = if self.coefficients.matches(config.order, config.mode) {
            Cow::Borrowed(&self.coefficients)
        } else {
            tracing::debug!("Prefiltering for order {}, mode {}", config.order, config.mode);
            Cow::Owned(SplineCoefficients::new(&self.samples, self.coefficients.shape(), config.order, config.mode)?)
        };

        let [_, n] = points.dims();
        let device = points.device();
        let values = coefficients.sample(&to_host(points)?, config.mode, config.cval)?;
        Ok(from_host(values, [n], &device))
    }
}

impl<B: Backend, const D: usize> fmt::Display for BSplineInterpolator<B, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BSplineInterpolator({}D)", D)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::config::BoundaryMode;
    use crate::error::WarpError;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_reproduces_samples() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0, 2.0], [3.0, 5.0, 4.0]], &device);
        let interpolator = BSplineInterpolator::new(image).unwrap();

        let points = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0, 1.0], [0.0, 1.0, 2.0]], &device);
        let values = to_host(interpolator.sample(points, &SampleOptions::new()).unwrap()).unwrap();

        for (v, e) in values.iter().zip([0.0, 5.0, 4.0]) {
            assert!((v - e).abs() < 1e-4);
        }
    }

    #[test]
    fn test_per_call_overrides() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0, 3.0, 4.0], &device);
        let config = InterpolatorConfig::default().with_cval(9.0);
        let interpolator = BSplineInterpolator::with_config(image, config).unwrap();

        let points = Tensor::<TestBackend, 2>::from_floats([[-1.0, 1.5]], &device);

        let inherited = to_host(interpolator.sample(points.clone(), &SampleOptions::new()).unwrap()).unwrap();
        assert_eq!(inherited[0], 9.0);

        let options = SampleOptions::new().order(1).mode(BoundaryMode::Nearest).cval(0.0);
        let overridden = to_host(interpolator.sample(points, &options).unwrap()).unwrap();
        assert_eq!(overridden[0], 1.0);
        assert!((overridden[1] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_explicit_zero_cval_is_honored() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0], &device);
        let config = InterpolatorConfig::default().with_cval(5.0);
        let interpolator = BSplineInterpolator::with_config(image, config).unwrap();

        let points = Tensor::<TestBackend, 2>::from_floats([[3.0]], &device);
        let values = to_host(interpolator.sample(points, &SampleOptions::new().cval(0.0)).unwrap()).unwrap();
        assert_eq!(values, vec![0.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 2>::zeros([4, 4], &device);
        let interpolator = BSplineInterpolator::new(image).unwrap();

        let points = Tensor::<TestBackend, 2>::zeros([3, 2], &device);
        assert!(matches!(
            interpolator.sample(points, &SampleOptions::new()),
            Err(WarpError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_far_points_follow_boundary_mode() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0, 3.0, 4.0], &device);
        let interpolator = BSplineInterpolator::new(image).unwrap();

        for mode in [BoundaryMode::Mirror, BoundaryMode::Wrap] {
            let points = Tensor::<TestBackend, 2>::from_floats([[1.0e20, -1.0e20]], &device);
            let values = to_host(interpolator.sample(points, &SampleOptions::new().mode(mode)).unwrap()).unwrap();
            assert!(values.iter().all(|v| v.is_finite()), "{:?}: {:?}", mode, values);
        }
    }

    #[test]
    fn test_display() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 3>::zeros([2, 3, 4], &device);
        let interpolator = BSplineInterpolator::new(image).unwrap();
        assert_eq!(interpolator.to_string(), "BSplineInterpolator(3D)");
    }
}
