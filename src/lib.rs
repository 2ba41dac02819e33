//! pricewatch library
//!
//! Exposes the capture-cycle core and its collaborators for use by the
//! binary and integration tests.

pub mod clock;
pub mod error;
pub mod models;
pub mod notify;
pub mod reconciler;
pub mod scrape;
pub mod stores;
pub mod tracker;
