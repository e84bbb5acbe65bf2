//! Screenshot comparison against stored baselines.
//!
//! A [`SnapshotComparator`] resolves a snapshot name to a baseline PNG,
//! adopts the candidate when no baseline exists yet, and otherwise counts the
//! pixels that differ beyond a perceptual threshold, writing a diff image
//! when any do. [`SnapshotSession`] wires a [`ScreenshotSource`], such as a
//! browser session, to the comparator.

pub mod comparator;
pub mod config;
pub mod diff;
pub mod error;
pub mod prelude;
pub mod raster;
pub mod session;
pub mod store;

pub use comparator::{ComparisonResult, SnapshotComparator};
pub use config::SnapshotConfig;
pub use diff::{ColorDistance, DiffOptions, PixelDiff, diff_images, render_diff};
pub use error::{Result, SnapshotError};
pub use session::{ScreenshotSource, SnapshotSession};
pub use store::SnapshotStore;
