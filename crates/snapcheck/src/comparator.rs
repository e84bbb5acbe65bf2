//! Comparison of a captured screenshot against its stored baseline.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::SnapshotConfig;
use crate::diff::{DiffOptions, render_diff};
use crate::error::{Result, SnapshotError, artifact_suffix};
use crate::raster::{load_png, save_png};
use crate::store::SnapshotStore;

/// Outcome of [`SnapshotComparator::compare`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparisonResult {
    /// `true` iff no pixel differs beyond the threshold.
    pub passed: bool,
    pub diff_pixel_count: usize,
    /// `true` when no baseline existed and the candidate was adopted as one.
    pub is_new_baseline: bool,
    /// Pixels above the threshold that were ignored as anti-aliasing.
    pub anti_aliased_pixel_count: usize,
    pub total_pixels: usize,
    /// Diff image written by this comparison, if any.
    pub diff_artifact: Option<PathBuf>,
}

impl ComparisonResult {
    fn new_baseline() -> Self {
        Self {
            passed: true,
            is_new_baseline: true,
            ..Default::default()
        }
    }

    /// One-line description suitable for a test failure message.
    pub fn summary(&self) -> String {
        if self.is_new_baseline {
            "no baseline found, candidate adopted as new baseline".to_string()
        } else if self.passed {
            "images match".to_string()
        } else {
            format!(
                "images are different by {} pixels{}",
                self.diff_pixel_count,
                artifact_suffix(&self.diff_artifact)
            )
        }
    }

    /// Converts a failing result into [`SnapshotError::Mismatch`].
    pub fn into_result(self) -> Result<Self> {
        if self.passed {
            Ok(self)
        } else {
            Err(SnapshotError::Mismatch {
                diff_pixel_count: self.diff_pixel_count,
                diff_artifact: self.diff_artifact,
            })
        }
    }
}

/// Compares candidates against the baselines of a [`SnapshotStore`].
#[derive(Debug, Clone)]
pub struct SnapshotComparator {
    store: SnapshotStore,
    options: DiffOptions,
}

impl SnapshotComparator {
    pub fn new(store: SnapshotStore, options: DiffOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { store, options })
    }

    pub fn from_config(config: &SnapshotConfig) -> Result<Self> {
        Self::new(SnapshotStore::from_config(config), config.diff.clone())
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compares the image at `candidate_path` against the baseline named `baseline_name`.
    ///
    /// A missing baseline is not a failure: the candidate is copied into the
    /// store and the result reports `is_new_baseline`. A candidate that does
    /// not decode is never adopted. When pixels differ, a diff image is
    /// written to the store's diff path, replacing any earlier one. The
    /// baseline itself is only ever read.
    pub fn compare(&self, baseline_name: &str, candidate_path: &Path) -> Result<ComparisonResult> {
        let baseline_path = self.store.baseline_path(baseline_name);

        if !self.store.has_baseline(baseline_name) {
            let adopted = self.store.adopt(baseline_name, candidate_path)?;
            info!(
                "no baseline for '{baseline_name}', adopted {} as {}",
                candidate_path.display(),
                adopted.display()
            );
            return Ok(ComparisonResult::new_baseline());
        }

        let baseline = load_png(&baseline_path)?;
        let candidate = load_png(candidate_path)?;
        let (diff, diff_image) = render_diff(&baseline, &candidate, &self.options)?;

        let mut result = ComparisonResult {
            passed: diff.is_match(),
            diff_pixel_count: diff.different_pixels,
            is_new_baseline: false,
            anti_aliased_pixel_count: diff.anti_aliased_pixels,
            total_pixels: diff.total_pixels,
            diff_artifact: None,
        };

        if result.passed {
            debug!(
                "'{baseline_name}' matches its baseline ({} anti-aliased pixels ignored)",
                diff.anti_aliased_pixels
            );
            return Ok(result);
        }

        let diff_path = self.store.diff_path().to_path_buf();
        save_png(&diff_path, &diff_image)?;
        warn!(
            "'{baseline_name}' differs from its baseline by {} of {} pixels ({:.2}%), diff written to {}",
            diff.different_pixels,
            diff.total_pixels,
            diff.ratio() * 100.0,
            diff_path.display()
        );
        result.diff_artifact = Some(diff_path);
        Ok(result)
    }
}
