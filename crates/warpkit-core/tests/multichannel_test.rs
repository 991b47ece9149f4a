use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use std::f64::consts::FRAC_PI_2;
use warpkit_core::tensor::to_host;
use warpkit_core::transform::{AffineParams, AffineTransform};
use warpkit_core::{
    BSplineInterpolator, BoundaryMode, ChannelAxis, Interpolator, InterpolatorConfig, LinearInterpolator,
    MultiChannelInterpolator, SampleOptions,
};

type B = NdArray<f32>;
type Device = <B as burn::tensor::backend::Backend>::Device;

const CROSS: [[f32; 5]; 5] = [
    [0.0, 0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0, 0.0],
];

/// Three channels holding the cross scaled by 1, 2 and 3.
fn channels(device: &Device) -> Vec<Tensor<B, 2>> {
    let cross = Tensor::<B, 2>::from_floats(CROSS, device);
    (1..=3).map(|k| cross.clone() * k as f32).collect()
}

fn rotation(device: &Device) -> AffineTransform<B> {
    AffineTransform::<B>::new(2, AffineParams::new().angles([FRAC_PI_2]).center([0.4, 0.4]), device).unwrap()
}

fn assert_close(actual: &[f32], expected: &[f32], tol: f32) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < tol, "element {}: got {}, expected {}", i, a, e);
    }
}

#[test]
fn test_bspline_channels_first_reproduces_rotation() {
    let device = Default::default();
    let image = Tensor::stack(channels(&device), 0);
    let expected = to_host(image.clone()).unwrap();

    let config = InterpolatorConfig::default().with_mode(BoundaryMode::Mirror);
    let interpolator =
        MultiChannelInterpolator::<B, _, 2, 3>::bspline(image, ChannelAxis::First, None, config).unwrap();
    let rotated = interpolator.transform(&[&rotation(&device)], &SampleOptions::new()).unwrap();

    assert_eq!(rotated.dims(), [3, 5, 5]);
    assert_close(&to_host(rotated).unwrap(), &expected, 1e-4);
}

#[test]
fn test_bspline_channels_last_reproduces_rotation() {
    let device = Default::default();
    let image = Tensor::stack(channels(&device), 2);
    let expected = to_host(image.clone()).unwrap();

    let config = InterpolatorConfig::default().with_mode(BoundaryMode::Mirror);
    let interpolator =
        MultiChannelInterpolator::<B, _, 2, 3>::bspline(image, ChannelAxis::Last, Some(vec![0.0; 3]), config)
            .unwrap();
    let rotated = interpolator.transform(&[&rotation(&device)], &SampleOptions::new()).unwrap();

    assert_eq!(rotated.dims(), [5, 5, 3]);
    assert_close(&to_host(rotated).unwrap(), &expected, 1e-4);
}

#[test]
fn test_matches_single_channel_interpolators() {
    let device = Default::default();
    let config = InterpolatorConfig::default().with_mode(BoundaryMode::Mirror);
    let transform = AffineTransform::<B>::new(2, AffineParams::new().angles([0.3]).center([0.4, 0.4]), &device)
        .unwrap();

    let multi = MultiChannelInterpolator::<B, _, 2, 3>::bspline(
        Tensor::stack(channels(&device), 0),
        ChannelAxis::First,
        None,
        config,
    )
    .unwrap();
    let warped = to_host(multi.transform(&[&transform], &SampleOptions::new()).unwrap()).unwrap();

    let mut expected = Vec::new();
    for channel in channels(&device) {
        let single = BSplineInterpolator::with_config(channel, config).unwrap();
        expected.extend(to_host(single.transform(&[&transform], &SampleOptions::new()).unwrap()).unwrap());
    }
    assert_close(&warped, &expected, 1e-6);
}

#[test]
fn test_linear_channels_rotation() {
    let device = Default::default();
    let rotated_cross = [
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 1.0, 1.0, 1.0, 1.0],
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0],
    ];

    let first = MultiChannelInterpolator::<B, _, 2, 3>::linear(Tensor::stack(channels(&device), 0), ChannelAxis::First)
        .unwrap();
    let rotated = first.transform(&[&rotation(&device)], &SampleOptions::new()).unwrap();
    let expected: Vec<f32> = (1..=3)
        .flat_map(|k| rotated_cross.iter().flatten().map(move |v: &f32| v * k as f32))
        .collect();
    assert_close(&to_host(rotated).unwrap(), &expected, 1e-4);

    let last = MultiChannelInterpolator::<B, _, 2, 3>::linear(Tensor::stack(channels(&device), 2), ChannelAxis::Last)
        .unwrap();
    let rotated = last.transform(&[&rotation(&device)], &SampleOptions::new()).unwrap();
    let expected: Vec<f32> = rotated_cross
        .iter()
        .flatten()
        .flat_map(|v| (1..=3).map(move |k| v * k as f32))
        .collect();
    assert_close(&to_host(rotated).unwrap(), &expected, 1e-4);
}

#[test]
fn test_channel_interpolators_share_grid() {
    let device = Default::default();
    let image = Tensor::<B, 3>::zeros([4, 6, 2], &device);
    let interpolator = MultiChannelInterpolator::<B, _, 2, 3>::linear(image, ChannelAxis::Last).unwrap();

    assert_eq!(interpolator.channels().len(), 2);
    assert_eq!(interpolator.shape(), [4, 6, 2]);
    assert_eq!(interpolator.grid().shape(), &[4, 6]);
    for channel in interpolator.channels() {
        let _: &LinearInterpolator<B, 2> = channel;
        assert_eq!(channel.shape(), [4, 6]);
    }
}
