//! Check-cycle behavior driven through fake collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use postwatch::error::{AppError, Result};
use postwatch::models::{EventRecord, KeywordStrategy, PageSnapshot, TrackedPackage};
use postwatch::pipeline::{CheckContext, Pacer, run_check};
use postwatch::services::{Notifier, PageFetcher, ReportFormatter};
use postwatch::storage::{LocalStorage, Watchlist, WatchlistStore};

/// Serves canned snapshots and records every identifier it is asked for.
#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, PageSnapshot>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn with(mut self, id: &str, snapshot: PageSnapshot) -> Self {
        self.pages.insert(id.to_string(), snapshot);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, id: &str) -> Result<PageSnapshot> {
        self.calls.lock().unwrap().push(id.to_string());
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::fetch(id, "connection reset"))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(AppError::notify("channel down"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

fn record(fields: &[&str]) -> EventRecord {
    EventRecord::new(fields.iter().copied()).unwrap()
}

fn page(events: Vec<EventRecord>) -> PageSnapshot {
    PageSnapshot {
        found: true,
        events,
        raw: String::new(),
    }
}

fn package(signature: Option<&str>, delivered: bool) -> TrackedPackage {
    let mut pkg = TrackedPackage::new("Order", Utc::now());
    pkg.last_signature = signature.map(str::to_string);
    pkg.delivered = delivered;
    pkg
}

struct Harness {
    notifier: RecordingNotifier,
    pacer: RecordingPacer,
    formatter: ReportFormatter,
    keywords: KeywordStrategy,
}

impl Harness {
    fn new() -> Self {
        Self {
            notifier: RecordingNotifier::default(),
            pacer: RecordingPacer::default(),
            formatter: ReportFormatter::new("Israel Post"),
            keywords: KeywordStrategy::default(),
        }
    }

    fn ctx<'a>(&'a self, fetcher: &'a FakeFetcher) -> CheckContext<'a> {
        CheckContext {
            fetcher,
            notifier: &self.notifier,
            pacer: &self.pacer,
            formatter: &self.formatter,
            keywords: &self.keywords,
            delay: Duration::from_secs(3),
        }
    }
}

#[tokio::test]
async fn delivered_package_is_never_fetched() {
    let harness = Harness::new();
    let fetcher = FakeFetcher::default().with("RR1IL", page(vec![record(&["01/01/2026", "x y"])]));

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(Some("02/01/2026|נמסר"), true));
    let before = watchlist.clone();

    let summary = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert!(fetcher.calls().is_empty());
    assert_eq!(summary.skipped_delivered, 1);
    assert_eq!(watchlist, before);
    assert!(harness.pacer.pauses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn first_check_baselines_without_notifying() {
    let harness = Harness::new();
    let fetcher = FakeFetcher::default().with(
        "RR1IL",
        page(vec![
            record(&["01/01/2026", "בדרך", "תל אביב"]),
            record(&["02/01/2026", "נמסר", "חיפה"]),
        ]),
    );

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(None, false));

    let summary = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(summary.baselined, 1);
    assert_eq!(summary.changed, 0);
    assert!(harness.notifier.sent().is_empty());

    let pkg = watchlist.get("RR1IL").unwrap();
    assert_eq!(pkg.last_signature.as_deref(), Some("02/01/2026|נמסר|חיפה"));
    assert!(pkg.delivered);
    assert!(pkg.last_checked_at.is_some());
}

#[tokio::test]
async fn change_to_delivered_notifies_with_delivered_marker() {
    let harness = Harness::new();
    let fetcher = FakeFetcher::default().with(
        "RR1IL",
        page(vec![
            record(&["01/01/2026", "בדרך"]),
            record(&["02/01/2026", "נמסר"]),
        ]),
    );

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(Some("01/01/2026|בדרך"), false));

    let summary = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(summary.changed, 1);
    assert_eq!(summary.notified, 1);
    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("✅"));
    assert!(sent[0].contains("RR1IL - Order"));

    let pkg = watchlist.get("RR1IL").unwrap();
    assert_eq!(pkg.last_signature.as_deref(), Some("02/01/2026|נמסר"));
    assert!(pkg.delivered);
}

#[tokio::test]
async fn repeated_identical_snapshot_is_unchanged() {
    let harness = Harness::new();
    let fetcher =
        FakeFetcher::default().with("RR1IL", page(vec![record(&["01/01/2026", "בדרך"])]));

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(None, false));

    let first = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;
    let second = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(first.baselined, 1);
    assert_eq!(second.unchanged, 1);
    assert!(harness.notifier.sent().is_empty());
}

#[tokio::test]
async fn not_found_leaves_signature_untouched() {
    let harness = Harness::new();
    let fetcher = FakeFetcher::default().with("RR1IL", PageSnapshot::not_found());

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(Some("01/01/2026|בדרך"), false));

    let summary = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(summary.no_data, 1);
    assert!(harness.notifier.sent().is_empty());
    let pkg = watchlist.get("RR1IL").unwrap();
    assert_eq!(pkg.last_signature.as_deref(), Some("01/01/2026|בדרך"));
    assert!(!pkg.delivered);
}

#[tokio::test]
async fn fetch_failure_is_isolated_and_leaves_state() {
    let harness = Harness::new();
    // RR1IL has no canned page, so fetching it fails.
    let fetcher = FakeFetcher::default()
        .with("RR2IL", page(vec![record(&["05/01/2026", "במיון"])]));

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(Some("01/01/2026|בדרך"), false));
    watchlist.upsert("RR2IL", package(Some("04/01/2026|בדרך"), false));
    let failed_before = watchlist.get("RR1IL").cloned();

    let summary = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(fetcher.calls(), vec!["RR1IL", "RR2IL"]);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.changed, 1);
    assert_eq!(watchlist.get("RR1IL").cloned(), failed_before);
}

#[tokio::test]
async fn pauses_between_fetches_only() {
    let harness = Harness::new();
    let fetcher = FakeFetcher::default()
        .with("RR1IL", page(vec![record(&["01/01/2026", "בדרך"])]))
        .with("RR3IL", page(vec![record(&["01/01/2026", "בדרך"])]))
        .with("RR4IL", page(vec![record(&["01/01/2026", "בדרך"])]));

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(None, false));
    watchlist.upsert("RR2IL", package(Some("x"), true));
    watchlist.upsert("RR3IL", package(None, false));
    watchlist.upsert("RR4IL", package(None, false));

    run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(fetcher.calls(), vec!["RR1IL", "RR3IL", "RR4IL"]);
    let pauses = harness.pacer.pauses.lock().unwrap().clone();
    assert_eq!(pauses, vec![Duration::from_secs(3); 2]);
}

#[tokio::test]
async fn notify_failure_does_not_roll_back_state() {
    let mut harness = Harness::new();
    harness.notifier.fail = true;
    let fetcher =
        FakeFetcher::default().with("RR1IL", page(vec![record(&["03/01/2026", "עצור במכס"])]));

    let mut watchlist = Watchlist::default();
    watchlist.upsert("RR1IL", package(Some("01/01/2026|בדרך"), false));

    let summary = run_check(&mut watchlist, &harness.ctx(&fetcher)).await;

    assert_eq!(summary.changed, 1);
    assert_eq!(summary.notify_failures, 1);
    assert_eq!(summary.notified, 0);
    assert!(harness.notifier.sent()[0].starts_with("🛃"));
    assert_eq!(
        watchlist.get("RR1IL").unwrap().last_signature.as_deref(),
        Some("03/01/2026|עצור במכס")
    );
}

#[tokio::test]
async fn cycle_commits_through_local_storage() {
    let tmp = tempfile::TempDir::new().unwrap();
    let storage = LocalStorage::new(tmp.path().join("state.json"));

    let mut watchlist = storage.load().await.unwrap();
    watchlist.upsert("RR1IL", package(None, false));
    storage.commit(&watchlist).await.unwrap();

    let harness = Harness::new();
    let fetcher =
        FakeFetcher::default().with("RR1IL", page(vec![record(&["01/01/2026", "בדרך"])]));

    let mut loaded = storage.load().await.unwrap();
    run_check(&mut loaded, &harness.ctx(&fetcher)).await;
    storage.commit(&loaded).await.unwrap();

    let reloaded = storage.load().await.unwrap();
    assert_eq!(
        reloaded.get("RR1IL").unwrap().last_signature.as_deref(),
        Some("01/01/2026|בדרך")
    );
}
