//! Capture cycle orchestration
//!
//! One cycle: fetch → build observations → append history → diff → persist
//! snapshot → notify. The history is persisted before the snapshot, so a
//! crash between the two saves loses at most the snapshot update, never a
//! historical record. The tracker itself is stateless between cycles; all
//! state lives in the two stores.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use crate::clock::Clock;
use crate::error::CycleError;
use crate::models::Observation;
use crate::notify::{CycleReport, Notifier};
use crate::reconciler;
use crate::scrape::ProductSource;
use crate::stores::{HistoryStore, SnapshotStore};

/// Owns the collaborators of the capture cycle. Everything is injected at
/// construction; there is no process-wide state.
pub struct Tracker {
    source: Arc<dyn ProductSource>,
    snapshot: SnapshotStore,
    history: HistoryStore,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl Tracker {
    pub fn new(
        source: Arc<dyn ProductSource>,
        snapshot: SnapshotStore,
        history: HistoryStore,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            snapshot,
            history,
            notifier,
            clock,
        }
    }

    /// Run a single capture cycle.
    ///
    /// A fetch error aborts before either store is touched. A corrupt store
    /// aborts the cycle with the error rather than silently discarding the
    /// persisted data.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let scraped = self.source.fetch_products().await?;
        let stamp = self.clock.capture_stamp();

        let observations: Vec<Observation> = scraped
            .into_iter()
            .map(|p| Observation::captured(p.name, p.price, stamp.clone()))
            .collect();

        // History first. append_history runs on the pre-diff batch so the
        // batch timestamp is the capture time.
        let records = self.history.load()?.into_records();
        let records = reconciler::append_history(&observations, records)?;
        self.history.save(&records)?;

        let previous = self.snapshot.load()?.into_rows();
        let observations = reconciler::diff(observations, &previous)?;
        self.snapshot.save(&observations)?;

        let report = CycleReport { stamp, observations };
        self.notifier.notify(&report).await;

        info!(
            items = report.observations.len(),
            changed = report.changed().count(),
            stamp = %report.stamp,
            "Capture cycle complete"
        );
        Ok(report)
    }

    /// Repeat [`run_cycle`](Self::run_cycle) forever on a fixed cadence.
    /// The first cycle runs immediately. A failed cycle is logged and the
    /// next tick proceeds.
    pub async fn run_forever(&self, every: Duration) {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = self.run_cycle().await {
                error!(error = %e, "Capture cycle failed");
            }
        }
    }
}
