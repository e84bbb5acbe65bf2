pub use crate::comparator::{ComparisonResult, SnapshotComparator};
pub use crate::config::SnapshotConfig;
pub use crate::diff::{ColorDistance, DiffOptions};
pub use crate::error::{Result, SnapshotError};
pub use crate::session::{ScreenshotSource, SnapshotSession};
pub use crate::store::SnapshotStore;
