use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while storing, loading or comparing snapshots.
///
/// A missing baseline is never an error: the comparator adopts the candidate
/// instead.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A file could not be read, written or copied.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file the operation was applied to.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A file exists but is not a decodable image.
    #[error("could not decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// An image could not be encoded to disk.
    #[error("could not encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Baseline and candidate have different sizes, so no pixel comparison is possible.
    #[error(
        "image dimensions differ: baseline is {}x{}, candidate is {}x{}",
        .baseline.0, .baseline.1, .candidate.0, .candidate.1
    )]
    DimensionMismatch {
        /// Width and height of the baseline.
        baseline: (u32, u32),
        /// Width and height of the candidate.
        candidate: (u32, u32),
    },
    /// A captured screenshot was not valid base64.
    #[error("could not decode base64 screenshot: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The configuration file contained invalid RON.
    #[error("could not parse RON config: {0}")]
    Config(#[from] ron::error::SpannedError),
    /// The configuration could not be serialized.
    #[error("could not serialize RON config: {0}")]
    ConfigSerialize(#[from] ron::Error),
    /// The perceptual threshold must lie in `0.0..=1.0`.
    #[error("threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f64),
    /// The candidate differs from its baseline.
    #[error("images are different by {diff_pixel_count} pixels{}", artifact_suffix(.diff_artifact))]
    Mismatch {
        diff_pixel_count: usize,
        diff_artifact: Option<PathBuf>,
    },
    /// The screenshot source failed to produce a capture.
    #[error("screenshot capture failed: {0}")]
    Capture(String),
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub(crate) fn artifact_suffix(diff_artifact: &Option<PathBuf>) -> String {
    match diff_artifact {
        Some(path) => format!(" (diff written to {})", path.display()),
        None => String::new(),
    }
}

pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;
