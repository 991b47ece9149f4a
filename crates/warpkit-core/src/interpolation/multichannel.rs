//! Multi-channel interpolation.
//!
//! Splits an image with a channel axis into single-channel images, runs one
//! interpolator per channel and stacks the results back along the same axis.

use std::fmt;
use std::marker::PhantomData;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::image::Grid;
use crate::tensor::fixed_shape;
use crate::transform::Transform;
use super::bspline::BSplineInterpolator;
use super::config::{ChannelAxis, InterpolatorConfig, SampleOptions};
use super::linear::LinearInterpolator;
use super::trait_::Interpolator;

/// Interpolator for images with a channel axis.
///
/// # Type Parameters
/// * `I` - Per-channel interpolator
/// * `D` - Spatial dimensionality
/// * `C` - Rank of the full image, `D + 1`
#[derive(Debug)]
pub struct MultiChannelInterpolator<B: Backend, I, const D: usize, const C: usize> {
    axis: ChannelAxis,
    shape: [usize; C],
    channels: Vec<I>,
    _backend: PhantomData<B>,
}

impl<B, I, const D: usize, const C: usize> MultiChannelInterpolator<B, I, D, C>
where
    B: Backend,
    I: Interpolator<B, D>,
{
    /// Create a multi-channel interpolator.
    ///
    /// # Arguments
    /// * `image` - Image with `D` spatial axes and one channel axis
    /// * `axis` - Position of the channel axis
    /// * `cval` - Fill value per channel, zero for every channel when `None`
    /// * `factory` - Builds the interpolator of one channel from its image and fill value
    ///
    /// # Errors
    /// `InvalidConfiguration` if `C != D + 1` or `cval` does not have one
    /// entry per channel.
    pub fn new<F>(image: Tensor<B, C>, axis: ChannelAxis, cval: Option<Vec<f32>>, factory: F) -> Result<Self>
    where
        F: Fn(Tensor<B, D>, f32) -> Result<I>,
    {
        if C != D + 1 {
            return Err(WarpError::invalid_configuration(format!(
                "A {}D multi-channel image needs {} axes, got {}",
                D,
                D + 1,
                C
            )));
        }

        let shape = image.dims();
        let (channel_dim, spatial) = match axis {
            ChannelAxis::First => (0, &shape[1..]),
            ChannelAxis::Last => (C - 1, &shape[..C - 1]),
        };
        let n_channels = shape[channel_dim];
        if n_channels == 0 {
            return Err(WarpError::invalid_configuration("Image has no channels"));
        }
        let spatial: [usize; D] = fixed_shape(spatial)?;

        let cval = match cval {
            Some(values) if values.len() != n_channels => {
                return Err(WarpError::invalid_configuration(format!(
                    "Got {} fill values for {} channels",
                    values.len(),
                    n_channels
                )));
            }
            Some(values) => values,
            None => vec![0.0; n_channels],
        };

        let channels = cval
            .into_iter()
            .enumerate()
            .map(|(c, fill)| {
                let channel = image.clone().narrow(channel_dim, c, 1).reshape(spatial);
                factory(channel, fill)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Created {}D multi-channel interpolator with {} channels ({})", D, n_channels, axis);

        Ok(Self {
            axis,
            shape,
            channels,
            _backend: PhantomData,
        })
    }

    /// Shape of the full image, channel axis included.
    pub fn shape(&self) -> [usize; C] {
        self.shape
    }

    pub fn axis(&self) -> ChannelAxis {
        self.axis
    }

    pub fn channels(&self) -> &[I] {
        &self.channels
    }

    /// The sampling grid shared by all channels.
    pub fn grid(&self) -> &Grid<B> {
        self.channels[0].grid()
    }

    /// Sample every channel at points given in index space.
    ///
    /// Returns `[channels, N]` for channels first and `[N, channels]` for
    /// channels last.
    pub fn sample(&self, points: Tensor<B, 2>, options: &SampleOptions) -> Result<Tensor<B, 2>> {
        let values = self
            .channels
            .iter()
            .map(|channel| channel.sample(points.clone(), options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Tensor::stack(values, self.stack_dim(1)))
    }

    /// Resample every channel on a grid.
    pub fn resample(&self, grid: &Grid<B>, options: &SampleOptions) -> Result<Tensor<B, C>> {
        let values = self
            .channels
            .iter()
            .map(|channel| channel.resample(grid, options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Tensor::stack(values, self.stack_dim(D)))
    }

    /// Warp every channel with the same transforms.
    pub fn transform(&self, transforms: &[&dyn Transform<B>], options: &SampleOptions) -> Result<Tensor<B, C>> {
        let values = self
            .channels
            .iter()
            .map(|channel| channel.transform(transforms, options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Tensor::stack(values, self.stack_dim(D)))
    }

    fn stack_dim(&self, last: usize) -> usize {
        match self.axis {
            ChannelAxis::First => 0,
            ChannelAxis::Last => last,
        }
    }
}

impl<B: Backend, const D: usize, const C: usize> MultiChannelInterpolator<B, BSplineInterpolator<B, D>, D, C> {
    /// One B-spline interpolator per channel sharing `config`, except for the fill value.
    pub fn bspline(
        image: Tensor<B, C>,
        axis: ChannelAxis,
        cval: Option<Vec<f32>>,
        config: InterpolatorConfig,
    ) -> Result<Self> {
        Self::new(image, axis, cval, |channel, fill| {
            BSplineInterpolator::with_config(channel, config.with_cval(fill))
        })
    }
}

impl<B: Backend, const D: usize, const C: usize> MultiChannelInterpolator<B, LinearInterpolator<B, D>, D, C> {
    /// One linear interpolator per channel.
    pub fn linear(image: Tensor<B, C>, axis: ChannelAxis) -> Result<Self> {
        Self::new(image, axis, None, |channel, _| LinearInterpolator::new(channel))
    }
}

impl<B: Backend, I, const D: usize, const C: usize> fmt::Display for MultiChannelInterpolator<B, I, D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiChannelInterpolator({}D, {})", D, self.axis)
    }
}
