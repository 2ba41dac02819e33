//! Latest Snapshot Store
//!
//! Flat CSV table holding the most recent observation per tracked item,
//! one header row, columns `name,price,latest_change,price_change`. The
//! file layout is shared with the pre-existing deployment, so rows must
//! round-trip byte-compatibly.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::models::Observation;

use super::tmp_path;

/// Result of reading the snapshot table.
///
/// Absence (first run) and corruption are distinct: a missing file is an
/// empty initial state, an unreadable existing file is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotState {
    /// No store file yet.
    Absent,
    /// All persisted rows, at most one per item name.
    Rows(Vec<Observation>),
}

impl SnapshotState {
    /// Collapse to rows, treating absence as empty.
    pub fn into_rows(self) -> Vec<Observation> {
        match self {
            SnapshotState::Absent => Vec::new(),
            SnapshotState::Rows(rows) => rows,
        }
    }
}

/// Persistent table of the most recent observation per item.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all persisted rows.
    pub fn load(&self) -> Result<SnapshotState, StoreError> {
        if !self.path.exists() {
            return Ok(SnapshotState::Absent);
        }

        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            let obs: Observation = row.map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
            rows.push(obs);
        }

        debug!(rows = rows.len(), path = %self.path.display(), "Snapshot loaded");
        Ok(SnapshotState::Rows(rows))
    }

    /// Replace the whole table with the given rows.
    ///
    /// Written to a `.tmp` sibling and renamed over the target, so a crash
    /// mid-save never leaves a half-written store behind.
    pub fn save(&self, rows: &[Observation]) -> Result<(), StoreError> {
        let tmp = tmp_path(&self.path);

        let mut writer = csv::Writer::from_path(&tmp).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            reason: e.to_string(),
        })?;
        for row in rows {
            writer.serialize(row).map_err(|e| StoreError::Write {
                path: tmp.clone(),
                reason: e.to_string(),
            })?;
        }
        writer.flush().map_err(|e| StoreError::Write {
            path: tmp.clone(),
            reason: e.to_string(),
        })?;
        drop(writer);

        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        debug!(rows = rows.len(), path = %self.path.display(), "Snapshot saved");
        Ok(())
    }
}
