use serde::{Deserialize, Serialize};

/// Sentinel shown in `price_change` until a differing price has been seen.
pub const NO_DATA: &str = "N/A";

/// Minute-precision UTC timestamp format used across both stores.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One item's price reading at one point in time, plus the derived display
/// fields filled in by the reconciler.
///
/// Field order matters: it is the column order of the snapshot CSV
/// (`name,price,latest_change,price_change`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Item identifier; the join key against the previous snapshot.
    /// Matched by exact string equality, never normalized.
    pub name: String,
    pub price: f64,
    /// When the price was last observed to change, or the capture time if
    /// this is the first sighting. Kept as a formatted string so a value
    /// carried over from the previous snapshot stays byte-identical.
    pub latest_change: String,
    /// Percentage delta since the previous differing price, e.g. `"+10%"`,
    /// or [`NO_DATA`].
    pub price_change: String,
}

impl Observation {
    /// A freshly captured observation: derived fields at their initial
    /// values, `latest_change` at the capture time.
    pub fn captured(name: String, price: f64, stamp: String) -> Self {
        Self {
            name,
            price,
            latest_change: stamp,
            price_change: NO_DATA.to_string(),
        }
    }
}

/// A `(name, price)` pair as recorded in the historical log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedPrice {
    pub name: String,
    pub price: f64,
}

/// One capture batch in the historical log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub timestamp: String,
    pub data: Vec<QuotedPrice>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub product_url: String,
    pub name_selector: String,
    pub price_selector: String,
    pub snapshot_path: String,
    pub history_path: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub desktop_notifications: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let product_url = std::env::var("PRODUCT_URL").unwrap_or_else(|_| {
            "https://www.wayfair.ca/home/pdp/archie-oscar-southwick-ecoflex-dog-crate-end-table-durable-wood-plastic-composite-with-stainless-steel-latch-aosc1016.html?piid=30959894%2C30959892"
                .to_string()
        });

        let name_selector = std::env::var("NAME_SELECTOR")
            .unwrap_or_else(|_| "h1._6o3atz174.hapmhk7.hapmhkf.hapmhkl".to_string());

        let price_selector = std::env::var("PRICE_SELECTOR")
            .unwrap_or_else(|_| "span._6o3atzbl._6o3atzc7._6o3atz19j".to_string());

        let snapshot_path =
            std::env::var("SNAPSHOT_PATH").unwrap_or_else(|_| "./prices.csv".to_string());

        let history_path =
            std::env::var("HISTORY_PATH").unwrap_or_else(|_| "./historical.json".to_string());

        // Default cadence matches the original deployment: every 3 hours.
        let poll_interval_secs = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "10800".to_string())
            .parse()
            .unwrap_or(10800);

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let desktop_notifications = std::env::var("DESKTOP_NOTIFICATIONS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(true);

        Ok(Self {
            product_url,
            name_selector,
            price_selector,
            snapshot_path,
            history_path,
            poll_interval_secs,
            request_timeout_secs,
            desktop_notifications,
        })
    }
}
