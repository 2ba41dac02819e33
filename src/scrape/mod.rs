//! Product data acquisition.
//!
//! The tracker consumes [`ProductSource`]; [`PageScraper`] is the live
//! implementation against the configured product page.

pub mod product_page;

use async_trait::async_trait;

use crate::error::FetchError;

pub use product_page::PageScraper;

/// A raw `{name, price}` pair as scraped from a page, before any derived
/// fields exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedProduct {
    pub name: String,
    pub price: f64,
}

/// Supplies the items observed in one capture cycle. Errors are propagated
/// to the cycle, not retried here.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<ScrapedProduct>, FetchError>;
}
