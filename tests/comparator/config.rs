use std::path::PathBuf;

use snapcheck::{ColorDistance, DiffOptions, SnapshotConfig, SnapshotError};

use super::helpers::*;

#[test]
fn defaults_follow_the_working_directory_layout() {
    let config = SnapshotConfig::default();
    assert_eq!(config.root, PathBuf::from("."));
    assert_eq!(config.baseline_dir, PathBuf::from("old"));
    assert_eq!(config.candidate_dir, PathBuf::from("screenshots"));
    assert_eq!(config.diff_path, PathBuf::from("diff.png"));
    assert_eq!(config.diff, DiffOptions::default());
    assert!((config.diff.threshold - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.diff.distance, ColorDistance::Yiq);
    assert!(!config.diff.include_anti_aliasing);
}

#[test]
fn save_and_load_preserve_settings() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("snapcheck.ron");
    let config = SnapshotConfig {
        diff_path: "artifacts/diff.png".into(),
        diff: DiffOptions {
            distance: ColorDistance::PerChannel { tolerance: 4 },
            threshold: 0.25,
            diff_color_alt: Some([0, 255, 0]),
            ..Default::default()
        },
        ..ws.config()
    };

    config.save(&path).unwrap();
    assert_eq!(SnapshotConfig::load(&path).unwrap(), config);
}

#[test]
fn partial_config_fills_in_defaults() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("snapcheck.ron");
    std::fs::write(
        &path,
        r#"(
            baseline_dir: "baselines",
            diff: (threshold: 0.2, distance: PerChannel(tolerance: 8)),
        )"#,
    )
    .unwrap();

    let config = SnapshotConfig::load(&path).unwrap();
    assert_eq!(config.baseline_dir, PathBuf::from("baselines"));
    assert_eq!(config.candidate_dir, PathBuf::from("screenshots"));
    assert!((config.diff.threshold - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.diff.distance, ColorDistance::PerChannel { tolerance: 8 });
    assert_eq!(config.diff.diff_color, [255, 0, 0]);
}

#[test]
fn load_or_default_without_file() {
    let ws = Workspace::new();
    let config = SnapshotConfig::load_or_default(&ws.dir.path().join("missing.ron")).unwrap();
    assert_eq!(config, SnapshotConfig::default());
}

#[test]
fn malformed_config_is_a_parse_error() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("snapcheck.ron");
    std::fs::write(&path, "(baseline_dir: ").unwrap();

    let err = SnapshotConfig::load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::Config(_)), "got {err:?}");
}

#[test]
fn out_of_range_threshold_in_config_is_rejected() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("snapcheck.ron");
    std::fs::write(&path, "(diff: (threshold: 3.0))").unwrap();

    let err = SnapshotConfig::load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::InvalidThreshold(_)), "got {err:?}");
}
