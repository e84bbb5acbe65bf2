//! Glue between an external screenshot capture and the comparator.

use tracing::debug;

use crate::comparator::{ComparisonResult, SnapshotComparator};
use crate::config::SnapshotConfig;
use crate::error::Result;

/// Anything that can capture the current screen, such as a browser session.
pub trait ScreenshotSource {
    /// Returns the current screen as a base64-encoded PNG.
    fn take_screenshot(&mut self) -> Result<String>;
}

impl<F> ScreenshotSource for F
where
    F: FnMut() -> Result<String>,
{
    fn take_screenshot(&mut self) -> Result<String> {
        self()
    }
}

pub struct SnapshotSession {
    comparator: SnapshotComparator,
}

impl SnapshotSession {
    pub fn new(comparator: SnapshotComparator) -> Self {
        Self { comparator }
    }

    pub fn from_config(config: &SnapshotConfig) -> Result<Self> {
        Ok(Self::new(SnapshotComparator::from_config(config)?))
    }

    pub fn comparator(&self) -> &SnapshotComparator {
        &self.comparator
    }

    /// Captures a screenshot, stores it as the candidate for `name` and
    /// compares it against the baseline of the same name.
    pub fn capture_and_compare(
        &self,
        source: &mut impl ScreenshotSource,
        name: &str,
    ) -> Result<ComparisonResult> {
        let encoded = source.take_screenshot()?;
        let candidate_path = self
            .comparator
            .store()
            .save_candidate_base64(name, &encoded)?;
        debug!("captured '{name}' to {}", candidate_path.display());
        self.comparator.compare(name, &candidate_path)
    }

    /// Like [`SnapshotSession::capture_and_compare`], but a mismatch is an error.
    pub fn assert_matches(
        &self,
        source: &mut impl ScreenshotSource,
        name: &str,
    ) -> Result<ComparisonResult> {
        self.capture_and_compare(source, name)?.into_result()
    }
}
