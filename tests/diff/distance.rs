use snapcheck::{ColorDistance, DiffOptions, SnapshotError, diff_images};

use super::helpers::*;

#[test]
fn identical_images_have_no_differences() {
    let img = with_square(&solid(8, 8, GRAY), 2, 2, 3, RED);

    let diff = diff_images(&img, &img.clone(), &DiffOptions::default()).unwrap();
    assert_eq!(diff.total_pixels, 64);
    assert_eq!(diff.different_pixels, 0);
    assert_eq!(diff.anti_aliased_pixels, 0);
    assert!(diff.is_match());
}

#[test]
fn counts_exactly_the_changed_pixels() {
    let baseline = solid(20, 20, GRAY);
    let changed = [(2, 2), (7, 3), (15, 15), (0, 19)];
    let candidate = with_pixels(&baseline, &changed, WHITE);

    let diff = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap();
    assert_eq!(diff.different_pixels, changed.len());
    assert!((diff.ratio() - 4.0 / 400.0).abs() < f64::EPSILON);
}

#[test]
fn square_on_black_counts_every_pixel_of_the_square() {
    let baseline = solid(100, 100, BLACK);
    let candidate = with_square(&baseline, 40, 40, 5, WHITE);

    let diff = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap();
    assert_eq!(diff.different_pixels, 25);
    assert_eq!(diff.anti_aliased_pixels, 0);
}

#[test]
fn small_noise_is_below_the_default_threshold() {
    let baseline = solid(4, 4, GRAY);
    let candidate = with_pixels(&baseline, &[(1, 1)], [103, 98, 101, 255]);

    let diff = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap();
    assert_eq!(diff.different_pixels, 0, "within the perceptual threshold");

    let strict = DiffOptions {
        threshold: 0.0,
        ..Default::default()
    };
    let diff_strict = diff_images(&baseline, &candidate, &strict).unwrap();
    assert_eq!(
        diff_strict.different_pixels, 1,
        "should differ with zero threshold"
    );
}

#[test]
fn chroma_change_with_similar_luminance_is_detected() {
    // similar brightness, very different hue
    let baseline = solid(3, 3, [200, 60, 60, 255]);
    let candidate = with_pixels(&baseline, &[(1, 1)], [60, 130, 60, 255]);

    let diff = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap();
    assert_eq!(diff.different_pixels, 1);
}

#[test]
fn fully_transparent_pixels_compare_equal() {
    let baseline = solid(2, 2, [0, 0, 0, 0]);
    let candidate = solid(2, 2, [255, 255, 255, 0]);

    let diff = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap();
    assert_eq!(diff.different_pixels, 0);
}

#[test]
fn per_channel_distance_respects_tolerance() {
    let baseline = solid(1, 1, [100, 100, 100, 255]);
    let candidate = solid(1, 1, [103, 98, 101, 255]);

    let lenient = DiffOptions {
        distance: ColorDistance::PerChannel { tolerance: 5 },
        ..Default::default()
    };
    let diff = diff_images(&baseline, &candidate, &lenient).unwrap();
    assert_eq!(diff.different_pixels, 0, "within per-channel tolerance");

    let diff_strict = diff_images(&baseline, &candidate, &DiffOptions::strict()).unwrap();
    assert_eq!(
        diff_strict.different_pixels, 1,
        "should differ with zero tolerance"
    );
}

#[test]
fn per_channel_distance_counts_alpha() {
    let baseline = solid(2, 1, [10, 10, 10, 255]);
    let candidate = solid(2, 1, [10, 10, 10, 128]);

    let diff = diff_images(&baseline, &candidate, &DiffOptions::strict()).unwrap();
    assert_eq!(diff.different_pixels, 2);
}

#[test]
fn dimension_mismatch_is_an_error() {
    let baseline = solid(10, 10, BLACK);
    let candidate = solid(10, 11, BLACK);

    let err = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap_err();
    match err {
        SnapshotError::DimensionMismatch {
            baseline,
            candidate,
        } => {
            assert_eq!(baseline, (10, 10));
            assert_eq!(candidate, (10, 11));
        }
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn width_mismatch_is_an_error() {
    let baseline = solid(10, 10, BLACK);
    let candidate = solid(11, 10, BLACK);

    let err = diff_images(&baseline, &candidate, &DiffOptions::default()).unwrap_err();
    assert!(
        matches!(
            err,
            SnapshotError::DimensionMismatch {
                baseline: (10, 10),
                candidate: (11, 10)
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn threshold_outside_unit_range_is_rejected() {
    let img = solid(1, 1, BLACK);
    for threshold in [-0.1, 1.5, f64::NAN] {
        let options = DiffOptions {
            threshold,
            ..Default::default()
        };
        let err = diff_images(&img, &img, &options).unwrap_err();
        assert!(
            matches!(err, SnapshotError::InvalidThreshold(_)),
            "threshold {threshold} should be rejected, got {err:?}"
        );
    }
}
