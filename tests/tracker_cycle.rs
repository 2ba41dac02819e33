//! End-to-end capture cycle tests.
//!
//! Drives `Tracker::run_cycle` directly with a stubbed product source and a
//! fixed clock against stores in a scratch directory — no network, no real
//! time, no notification daemon.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use pricewatch::clock::Clock;
use pricewatch::error::{CycleError, FetchError, StoreError};
use pricewatch::models::NO_DATA;
use pricewatch::notify::{CycleReport, Notifier};
use pricewatch::scrape::{ProductSource, ScrapedProduct};
use pricewatch::stores::{HistoryStore, SnapshotStore};
use pricewatch::tracker::Tracker;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Serves pre-queued fetch results, one per cycle.
struct StubSource {
    results: Mutex<VecDeque<Result<Vec<ScrapedProduct>, FetchError>>>,
}

impl StubSource {
    fn returning(products: Vec<ScrapedProduct>) -> Self {
        Self {
            results: Mutex::new(VecDeque::from([Ok(products)])),
        }
    }

    fn failing(err: FetchError) -> Self {
        Self {
            results: Mutex::new(VecDeque::from([Err(err)])),
        }
    }
}

#[async_trait]
impl ProductSource for StubSource {
    async fn fetch_products(&self) -> Result<Vec<ScrapedProduct>, FetchError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .expect("stub source exhausted")
    }
}

/// Records every report it is handed.
#[derive(Default)]
struct RecordingNotifier {
    reports: Mutex<Vec<CycleReport>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, report: &CycleReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

fn product(name: &str, price: f64) -> ScrapedProduct {
    ScrapedProduct {
        name: name.to_string(),
        price,
    }
}

fn tracker_for_cycle(
    dir: &Path,
    source: StubSource,
    at: DateTime<Utc>,
    notifier: Arc<RecordingNotifier>,
) -> Tracker {
    Tracker::new(
        Arc::new(source),
        SnapshotStore::new(dir.join("prices.csv")),
        HistoryStore::new(dir.join("historical.json")),
        notifier,
        Arc::new(FixedClock(at)),
    )
}

fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 25, 9, 0, 0).unwrap()
}

fn t2() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 25, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn first_cycle_seeds_both_stores() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());

    let tracker = tracker_for_cycle(
        dir.path(),
        StubSource::returning(vec![product("Table", 50.0)]),
        t1(),
        notifier.clone(),
    );
    tracker.run_cycle().await.unwrap();

    let rows = SnapshotStore::new(dir.path().join("prices.csv"))
        .load()
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Table");
    assert_eq!(rows[0].price, 50.0);
    assert_eq!(rows[0].latest_change, "2024-01-25 09:00");
    assert_eq!(rows[0].price_change, NO_DATA);

    let records = HistoryStore::new(dir.path().join("historical.json"))
        .load()
        .unwrap()
        .into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].timestamp, "2024-01-25 09:00");
    assert_eq!(records[0].data.len(), 1);
    assert_eq!(records[0].data[0].name, "Table");
    assert_eq!(records[0].data[0].price, 50.0);

    assert_eq!(notifier.reports.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn second_cycle_reconciles_against_first() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());

    tracker_for_cycle(
        dir.path(),
        StubSource::returning(vec![product("Table", 50.0)]),
        t1(),
        notifier.clone(),
    )
    .run_cycle()
    .await
    .unwrap();

    let first_record = HistoryStore::new(dir.path().join("historical.json"))
        .load()
        .unwrap()
        .into_records()
        .remove(0);

    tracker_for_cycle(
        dir.path(),
        StubSource::returning(vec![product("Table", 55.0)]),
        t2(),
        notifier.clone(),
    )
    .run_cycle()
    .await
    .unwrap();

    let rows = SnapshotStore::new(dir.path().join("prices.csv"))
        .load()
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price, 55.0);
    assert_eq!(rows[0].latest_change, "2024-01-25 12:00");
    assert_eq!(rows[0].price_change, "+10%");

    let records = HistoryStore::new(dir.path().join("historical.json"))
        .load()
        .unwrap()
        .into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], first_record);
    assert_eq!(records[1].timestamp, "2024-01-25 12:00");
    assert_eq!(records[1].data[0].price, 55.0);
}

#[tokio::test]
async fn unchanged_price_keeps_original_change_stamp() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());

    tracker_for_cycle(
        dir.path(),
        StubSource::returning(vec![product("Table", 50.0)]),
        t1(),
        notifier.clone(),
    )
    .run_cycle()
    .await
    .unwrap();

    tracker_for_cycle(
        dir.path(),
        StubSource::returning(vec![product("Table", 50.0)]),
        t2(),
        notifier.clone(),
    )
    .run_cycle()
    .await
    .unwrap();

    let rows = SnapshotStore::new(dir.path().join("prices.csv"))
        .load()
        .unwrap()
        .into_rows();
    assert_eq!(rows[0].latest_change, "2024-01-25 09:00");
    assert_eq!(rows[0].price_change, NO_DATA);

    // The history still gains a record for the cycle.
    let records = HistoryStore::new(dir.path().join("historical.json"))
        .load()
        .unwrap()
        .into_records();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn one_record_per_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());

    for (i, minute) in [0u32, 10, 20, 30].iter().enumerate() {
        let at = Utc.with_ymd_and_hms(2024, 1, 25, 9, *minute, 0).unwrap();
        tracker_for_cycle(
            dir.path(),
            StubSource::returning(vec![product("Table", 50.0 + i as f64)]),
            at,
            notifier.clone(),
        )
        .run_cycle()
        .await
        .unwrap();
    }

    let records = HistoryStore::new(dir.path().join("historical.json"))
        .load()
        .unwrap()
        .into_records();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].timestamp, "2024-01-25 09:00");
    assert_eq!(records[3].timestamp, "2024-01-25 09:30");
}

#[tokio::test]
async fn failed_fetch_leaves_stores_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());

    let tracker = tracker_for_cycle(
        dir.path(),
        StubSource::failing(FetchError::BadPrice {
            text: "call for price".to_string(),
        }),
        t1(),
        notifier.clone(),
    );

    let err = tracker.run_cycle().await.unwrap_err();
    assert!(matches!(err, CycleError::Fetch(_)));

    assert!(!dir.path().join("prices.csv").exists());
    assert!(!dir.path().join("historical.json").exists());
    assert!(notifier.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_snapshot_fails_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::default());

    std::fs::write(
        dir.path().join("prices.csv"),
        "name,price,latest_change,price_change\nTable,not-a-number,x,y\n",
    )
    .unwrap();

    let tracker = tracker_for_cycle(
        dir.path(),
        StubSource::returning(vec![product("Table", 50.0)]),
        t1(),
        notifier.clone(),
    );

    let err = tracker.run_cycle().await.unwrap_err();
    assert!(matches!(err, CycleError::Store(StoreError::Corrupt { .. })));
    assert!(notifier.reports.lock().unwrap().is_empty());
}
