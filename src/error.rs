//! Error taxonomy for the price tracker.
//!
//! One enum per failure domain, composed into [`CycleError`] at the cycle
//! boundary. A missing store file is deliberately *not* represented here:
//! absence is an empty initial state, only an existing-but-unreadable store
//! is an error.

use std::path::PathBuf;
use thiserror::Error;

/// Fetch-side failures. Any of these aborts the cycle before either store
/// is touched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport error talking to the product page.
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page came back but a required field did not match its selector.
    #[error("page field '{field}' not found (selector: {selector})")]
    MissingField {
        field: &'static str,
        selector: String,
    },

    /// The price text could not be parsed into a number.
    #[error("unparsable price text: {text:?}")]
    BadPrice { text: String },
}

/// Store read/write failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file exists but could not be read or parsed. Surfaced
    /// rather than treated as "no prior data" so corruption never silently
    /// discards history.
    #[error("store {} exists but could not be read: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Failed to write or replace the store file.
    #[error("failed to write store {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Computation failures in the reconciler. Both cases are undefined in the
/// system this replaces; here they are explicit, reported errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Previous price of zero makes the change percentage undefined.
    #[error("previous price for {name:?} is zero; change percentage undefined")]
    ZeroBaseline { name: String },

    /// An empty observation batch has no timestamp to record.
    #[error("refusing to append an empty observation batch to the history")]
    EmptyBatch,
}

/// Everything that can fail inside one capture cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}
