//! pricewatch - single-product price tracker
//! Mission: Watch one product page, never lose a price change

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricewatch::{
    clock::SystemClock,
    models::Config,
    notify::{DesktopNotifier, LogNotifier, Notifier},
    scrape::PageScraper,
    stores::{HistoryStore, SnapshotStore},
    tracker::Tracker,
};

#[derive(Debug, Parser)]
#[command(name = "pricewatch", about = "Track one product page's price over time")]
struct Cli {
    /// Run a single capture cycle and exit instead of polling forever.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!(
        url = %config.product_url,
        interval_secs = config.poll_interval_secs,
        "Starting price tracker"
    );

    let source = Arc::new(PageScraper::new(&config)?);
    let snapshot = SnapshotStore::new(&config.snapshot_path);
    let history = HistoryStore::new(&config.history_path);
    let notifier: Arc<dyn Notifier> = if config.desktop_notifications {
        Arc::new(DesktopNotifier)
    } else {
        Arc::new(LogNotifier)
    };

    let tracker = Tracker::new(source, snapshot, history, notifier, Arc::new(SystemClock));

    if cli.once {
        tracker.run_cycle().await?;
        return Ok(());
    }

    tracker
        .run_forever(Duration::from_secs(config.poll_interval_secs))
        .await;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricewatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
