use burn::tensor::{Distribution, Tensor};
use burn_ndarray::NdArray;
use proptest::prelude::*;
use warpkit_core::tensor::{from_host, to_host};
use warpkit_core::transform::{
    AffineParams, AffineTransform, BSplineTransform, ComposedTransform, LinearTransform, Transform,
    TranslationTransform,
};
use warpkit_core::{Grid, WarpError};

type B = NdArray<f32>;

fn all_transforms_3d(device: &<B as burn::tensor::backend::Backend>::Device) -> Vec<Box<dyn Transform<B>>> {
    vec![
        Box::new(TranslationTransform::<B>::from_slice(&[0.1, 0.2, 0.3], device).unwrap()),
        Box::new(LinearTransform::<B>::new(Tensor::zeros([3, 4], device)).unwrap()),
        Box::new(AffineTransform::<B>::new(3, AffineParams::new().angles([0.1, 0.2, 0.3]), device).unwrap()),
        Box::new(BSplineTransform::new(Tensor::<B, 4>::zeros([3, 4, 4, 4], device)).unwrap()),
    ]
}

#[test]
fn test_dimension_mismatch_for_every_transform() {
    let device = Default::default();
    for transform in all_transforms_3d(&device) {
        let points = Tensor::<B, 2>::zeros([2, 10], &device);
        assert!(
            matches!(
                transform.transform(points, None),
                Err(WarpError::DimensionMismatch { expected: 3, actual: 2 })
            ),
            "{} accepted 2D points",
            transform
        );
    }

    let composed = ComposedTransform::new(all_transforms_3d(&device)).unwrap();
    let points = Tensor::<B, 2>::zeros([4, 10], &device);
    assert!(composed.transform(points, None).is_err());
}

#[test]
fn test_scale_length_mismatch() {
    let device = Default::default();
    let translation = TranslationTransform::<B>::from_slice(&[0.1, 0.2], &device).unwrap();
    let points = Tensor::<B, 2>::zeros([2, 3], &device);
    assert!(matches!(
        translation.transform(points, Some(&[10.0])),
        Err(WarpError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_wrong_control_grid() {
    let device = Default::default();
    let grid = Tensor::<B, 3>::random([3, 10, 10], Distribution::Default, &device);
    assert!(matches!(
        BSplineTransform::new(grid),
        Err(WarpError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_composed_display() {
    let device = Default::default();
    let bspline = BSplineTransform::new(Tensor::<B, 3>::random([2, 3, 4], Distribution::Default, &device)).unwrap();
    let composed = ComposedTransform::new(vec![Box::new(bspline.clone()), Box::new(bspline)]).unwrap();
    assert_eq!(composed.to_string(), "Composed(2D, BSpline(2D, 3x4)∘BSpline(2D, 3x4))");
}

#[test]
fn test_deformation_field_round_trip() {
    let device = Default::default();
    let shape = [8, 10];
    let grid = Grid::<B>::new(&shape, &device).unwrap();

    // A smooth displacement field from a known transform
    let bspline = BSplineTransform::new(Tensor::<B, 3>::random([2, 4, 5], Distribution::Uniform(-0.05, 0.05), &device))
        .unwrap();
    let field = grid.transform(&[&bspline]).unwrap().coordinates() - grid.coordinates();
    let expected = to_host(field.clone()).unwrap();

    let rebuilt = BSplineTransform::from_deformation_field(
        field.reshape([2, 8, 10]),
        BSplineTransform::<B>::default_config(),
    )
    .unwrap();
    assert_eq!(rebuilt.grid_size(), &[9, 11]);

    let reproduced = grid.transform(&[&rebuilt]).unwrap().coordinates() - grid.coordinates();
    for (r, e) in to_host(reproduced).unwrap().iter().zip(&expected) {
        assert!((r - e).abs() < 1e-4, "got {}, expected {}", r, e);
    }
}

#[test]
fn test_transform_does_not_touch_input() {
    let device = Default::default();
    let points = Tensor::<B, 2>::from_floats([[0.1, 0.2], [0.3, 0.4]], &device);
    let before = to_host(points.clone()).unwrap();

    let translation = TranslationTransform::<B>::from_slice(&[1.0, 1.0], &device).unwrap();
    let _ = translation.transform(points.clone(), None).unwrap();

    assert_eq!(to_host(points).unwrap(), before);
}

proptest! {
    #[test]
    fn prop_translation_inverse_is_identity(
        t in prop::collection::vec(-1.0f32..1.0, 3),
        p in prop::collection::vec(-5.0f32..5.0, 12),
    ) {
        let device = Default::default();
        let forward = TranslationTransform::<B>::from_slice(&t, &device).unwrap();
        let inverse: Vec<f32> = t.iter().map(|v| -v).collect();
        let backward = TranslationTransform::<B>::from_slice(&inverse, &device).unwrap();
        let composed = ComposedTransform::new(vec![Box::new(forward), Box::new(backward)]).unwrap();

        let points = from_host::<B, 2>(p.clone(), [3, 4], &device);
        let result = to_host(composed.transform(points, None).unwrap()).unwrap();
        for (r, e) in result.iter().zip(&p) {
            prop_assert!((r - e).abs() < 1e-5);
        }
    }

    #[test]
    fn prop_rotation_inverse_is_identity(angle in -3.0f64..3.0, p in prop::collection::vec(0.0f32..1.0, 10)) {
        let device = Default::default();
        let params = AffineParams::new().center([0.5, 0.5]);
        let forward = AffineTransform::<B>::new(2, params.clone().angles([angle]), &device).unwrap();
        let backward = AffineTransform::<B>::new(2, params.angles([-angle]), &device).unwrap();
        let composed = ComposedTransform::new(vec![Box::new(forward), Box::new(backward)]).unwrap();

        let points = from_host::<B, 2>(p.clone(), [2, 5], &device);
        let result = to_host(composed.transform(points, None).unwrap()).unwrap();
        for (r, e) in result.iter().zip(&p) {
            prop_assert!((r - e).abs() < 1e-5);
        }
    }

    #[test]
    fn prop_composition_applies_leftmost_first(
        s in 0.5f64..2.0,
        t in -1.0f32..1.0,
        x in -1.0f32..1.0,
    ) {
        let device = Default::default();
        let scale = AffineTransform::<B>::new(1, AffineParams::new().scaling([s]), &device).unwrap();
        let shift = TranslationTransform::<B>::from_slice(&[t], &device).unwrap();
        let composed = ComposedTransform::new(vec![Box::new(shift), Box::new(scale)]).unwrap();

        let points = from_host::<B, 2>(vec![x], [1, 1], &device);
        let result = to_host(composed.transform(points, None).unwrap()).unwrap();
        let expected = (x + t) * s as f32;
        prop_assert!((result[0] - expected).abs() < 1e-5);
    }
}
