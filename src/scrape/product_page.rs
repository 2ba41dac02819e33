//! Product page scraper
//!
//! Fetches the tracked product page and pulls name and price out of the
//! markup with CSS selectors. Selector strings come from configuration so
//! a page redesign is an env-var change, not a rebuild.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

use crate::error::FetchError;
use crate::models::Config;

use super::{ProductSource, ScrapedProduct};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// Live scraper for a single product page.
pub struct PageScraper {
    client: Client,
    url: String,
    name_selector: Selector,
    name_selector_src: String,
    price_selector: Selector,
    price_selector_src: String,
}

impl PageScraper {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    "en-US,en;q=0.9".parse().context("Invalid Accept-Language header")?,
                );
                headers.insert(
                    reqwest::header::USER_AGENT,
                    USER_AGENT.parse().context("Invalid User-Agent header")?,
                );
                headers
            })
            .build()
            .context("Failed to build HTTP client")?;

        let name_selector = Selector::parse(&config.name_selector)
            .map_err(|e| anyhow::anyhow!("invalid name selector {:?}: {}", config.name_selector, e))?;
        let price_selector = Selector::parse(&config.price_selector)
            .map_err(|e| anyhow::anyhow!("invalid price selector {:?}: {}", config.price_selector, e))?;

        Ok(Self {
            client,
            url: config.product_url.clone(),
            name_selector,
            name_selector_src: config.name_selector.clone(),
            price_selector,
            price_selector_src: config.price_selector.clone(),
        })
    }

    /// Pull name and price out of a fetched page body.
    fn extract(&self, body: &str) -> Result<ScrapedProduct, FetchError> {
        let document = Html::parse_document(body);

        let name = document
            .select(&self.name_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::MissingField {
                field: "name",
                selector: self.name_selector_src.clone(),
            })?;

        let price_text = document
            .select(&self.price_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::MissingField {
                field: "price",
                selector: self.price_selector_src.clone(),
            })?;

        let price = parse_price(&price_text)?;

        Ok(ScrapedProduct { name, price })
    }
}

#[async_trait]
impl ProductSource for PageScraper {
    async fn fetch_products(&self) -> Result<Vec<ScrapedProduct>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::Transport {
                url: self.url.clone(),
                source: e,
            })?;

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: self.url.clone(),
            source: e,
        })?;

        let product = self.extract(&body)?;
        info!(name = %product.name, price = product.price, "Scraped product page");

        Ok(vec![product])
    }
}

/// Turn displayed price text into a number: currency symbols and thousands
/// separators are stripped, everything else must parse as a float.
fn parse_price(text: &str) -> Result<f64, FetchError> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned.parse().map_err(|_| FetchError::BadPrice {
        text: text.to_string(),
    })
}
