//! Cycle notifications
//!
//! Best-effort delivery: a notification failure is logged and swallowed,
//! never propagated into the cycle result.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::{Observation, NO_DATA};

/// Outcome of one capture cycle, as handed to notifiers.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Capture stamp of the cycle.
    pub stamp: String,
    /// Reconciled observations, derived fields populated.
    pub observations: Vec<Observation>,
}

impl CycleReport {
    /// Observations whose price changed this cycle.
    pub fn changed(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(|o| o.price_change != NO_DATA)
    }

    /// Human-readable summary, one line per changed item.
    pub fn summary(&self) -> String {
        let mut lines = vec!["Your web scraping results are ready!".to_string()];
        for obs in self.changed() {
            lines.push(format!("{}: {} ({})", obs.name, obs.price, obs.price_change));
        }
        lines.join("\n")
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &CycleReport);
}

/// Desktop notification through the session notification daemon.
pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, report: &CycleReport) {
        let body = report.summary();

        // notify-rust talks to the bus synchronously.
        let result = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .summary("Price tracking tool")
                .body(&body)
                .action("read", "Mark as read")
                .show()
                .map(|_| ())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Desktop notification failed"),
            Err(e) => warn!(error = %e, "Desktop notification task failed"),
        }
    }
}

/// Log-only notifier for headless runs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, report: &CycleReport) {
        info!(
            stamp = %report.stamp,
            items = report.observations.len(),
            changed = report.changed().count(),
            "Price tracking results ready"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(name: &str, price: f64, change: &str) -> Observation {
        Observation {
            name: name.to_string(),
            price,
            latest_change: "2024-01-25 12:00".to_string(),
            price_change: change.to_string(),
        }
    }

    #[test]
    fn summary_lists_only_changed_items() {
        let report = CycleReport {
            stamp: "2024-01-25 12:00".to_string(),
            observations: vec![obs("Table", 55.0, "+10%"), obs("Lamp", 15.0, NO_DATA)],
        };

        let summary = report.summary();
        assert!(summary.contains("Table: 55 (+10%)"));
        assert!(!summary.contains("Lamp"));
    }
}
