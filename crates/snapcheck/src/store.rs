use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::SnapshotConfig;
use crate::error::{Result, SnapshotError};
use crate::raster::{decode_base64_png, decode_png, ensure_parent};

/// Filesystem layout for baselines, captured candidates and the diff artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    baseline_dir: PathBuf,
    candidate_dir: PathBuf,
    diff_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::from_config(&SnapshotConfig::with_root(root.as_ref()))
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self {
            baseline_dir: config.root.join(&config.baseline_dir),
            candidate_dir: config.root.join(&config.candidate_dir),
            diff_path: config.root.join(&config.diff_path),
        }
    }

    pub fn baseline_dir(&self) -> &Path {
        &self.baseline_dir
    }

    pub fn candidate_dir(&self) -> &Path {
        &self.candidate_dir
    }

    /// Fixed location of the most recent diff artifact.
    pub fn diff_path(&self) -> &Path {
        &self.diff_path
    }

    /// Resolves a snapshot name to its baseline file.
    pub fn baseline_path(&self, name: &str) -> PathBuf {
        self.baseline_dir.join(file_name(name))
    }

    /// Resolves a snapshot name to its candidate file.
    pub fn candidate_path(&self, name: &str) -> PathBuf {
        self.candidate_dir.join(file_name(name))
    }

    /// Whether anything occupies the baseline location for `name`.
    ///
    /// A directory or unreadable file there still counts, so that comparing
    /// against it fails instead of silently adopting a new baseline.
    pub fn has_baseline(&self, name: &str) -> bool {
        self.baseline_path(name).exists()
    }

    /// Copies the candidate's bytes into the baseline store under `name`.
    ///
    /// The candidate must decode as an image; a broken capture is reported
    /// with [`SnapshotError::Decode`] and nothing is written.
    pub fn adopt(&self, name: &str, candidate_path: &Path) -> Result<PathBuf> {
        let bytes =
            std::fs::read(candidate_path).map_err(|e| SnapshotError::io(candidate_path, e))?;
        decode_png(&bytes, candidate_path)?;

        let baseline_path = self.baseline_path(name);
        ensure_parent(&baseline_path)?;
        std::fs::write(&baseline_path, &bytes).map_err(|e| SnapshotError::io(&baseline_path, e))?;
        Ok(baseline_path)
    }

    /// Writes already-encoded PNG bytes as the candidate for `name`.
    pub fn save_candidate(&self, name: &str, png: &[u8]) -> Result<PathBuf> {
        let path = self.candidate_path(name);
        ensure_parent(&path)?;
        std::fs::write(&path, png).map_err(|e| SnapshotError::io(&path, e))?;
        debug!("stored candidate {} ({} bytes)", path.display(), png.len());
        Ok(path)
    }

    /// Writes a base64-encoded PNG, as returned by a browser screenshot, as
    /// the candidate for `name`.
    pub fn save_candidate_base64(&self, name: &str, encoded: &str) -> Result<PathBuf> {
        let png = decode_base64_png(encoded)?;
        self.save_candidate(name, &png)
    }
}

fn file_name(name: &str) -> PathBuf {
    let path = PathBuf::from(name);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("png")
    }
}
