use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diff::DiffOptions;
use crate::error::{Result, SnapshotError};
use crate::raster::ensure_parent;

/// Where snapshots live and how they are compared.
///
/// Relative directories are resolved against `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub root: PathBuf,
    pub baseline_dir: PathBuf,
    pub candidate_dir: PathBuf,
    pub diff_path: PathBuf,
    pub diff: DiffOptions,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            baseline_dir: PathBuf::from("old"),
            candidate_dir: PathBuf::from("screenshots"),
            diff_path: PathBuf::from("diff.png"),
            diff: DiffOptions::default(),
        }
    }
}

impl SnapshotConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Parses a RON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SnapshotError::io(path, e))?;
        let config: Self = ron::from_str(&contents)?;
        config.diff.validate()?;
        Ok(config)
    }

    /// Like [`SnapshotConfig::load`], but returns the defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        ensure_parent(path)?;
        std::fs::write(path, contents).map_err(|e| SnapshotError::io(path, e))
    }
}
