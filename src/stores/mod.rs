pub mod history;
pub mod snapshot;

use std::path::{Path, PathBuf};

pub use history::{HistoryState, HistoryStore};
pub use snapshot::{SnapshotState, SnapshotStore};

/// Sibling temp path for atomic replace: `prices.csv` -> `prices.csv.tmp`.
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
