//! Historical Log Store
//!
//! Append-only JSON document: an ordered list of capture batches, each a
//! `{"timestamp": ..., "data": [{"name", "price"}, ...]}` object. The file
//! is read in full, one record appended by the reconciler, and rewritten —
//! O(history) per cycle, fine at this scale, a known limit for very long
//! histories. Pretty-printed with 2-space indentation to stay compatible
//! with existing deployments.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::models::HistoricalRecord;

use super::tmp_path;

/// Result of reading the historical log.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    /// No log file yet.
    Absent,
    Records(Vec<HistoricalRecord>),
}

impl HistoryState {
    /// Collapse to records, treating absence as empty.
    pub fn into_records(self) -> Vec<HistoricalRecord> {
        match self {
            HistoryState::Absent => Vec::new(),
            HistoryState::Records(records) => records,
        }
    }
}

/// Persistent sequence of past capture batches.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full persisted sequence.
    pub fn load(&self) -> Result<HistoryState, StoreError> {
        if !self.path.exists() {
            return Ok(HistoryState::Absent);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let records: Vec<HistoricalRecord> =
            serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(records = records.len(), path = %self.path.display(), "History loaded");
        Ok(HistoryState::Records(records))
    }

    /// Rewrite the log with the full sequence, via `.tmp` + rename.
    pub fn save(&self, records: &[HistoricalRecord]) -> Result<(), StoreError> {
        let tmp = tmp_path(&self.path);

        let contents =
            serde_json::to_string_pretty(records).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        fs::write(&tmp, contents).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            reason: e.to_string(),
        })?;

        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        debug!(records = records.len(), path = %self.path.display(), "History saved");
        Ok(())
    }
}
