use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use recalibra_core::config::MonitorConfig;
use recalibra_core::models::{DriftCheckResult, OutcomeRecord, PredictionRecord, YesNo};
use recalibra_core::traits::{IDriftCheckStore, IDriftObserver};
use recalibra_drift::DriftDetector;
use recalibra_monitor::{BroadcastObserver, DriftMonitor, ModelOutcome, SkipReason};
use test_fixtures::MemoryStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// One matched pair per value, a day apart, predicted 0.5 above measured.
fn seed(store: &MemoryStore, model_id: &str, measured: &[f64]) {
    for (i, &m) in measured.iter().enumerate() {
        let molecule = format!("{model_id}-{i:03}");
        let at = t0() + Duration::days(i64::try_from(i).unwrap());
        store.add_predictions([PredictionRecord::new(&molecule, model_id, m + 0.5)]);
        store.add_outcomes([OutcomeRecord::new(&molecule, m).observed_at(at)]);
    }
}

/// Sixty days of a repeating 0..9 pattern.
fn stable() -> Vec<f64> {
    (0..60i32).map(|i| f64::from(i % 10)).collect()
}

/// Same pattern, shifted by 20 from day 30 on.
fn shifted() -> Vec<f64> {
    (0..60i32)
        .map(|i| f64::from(i % 10) + if i >= 30 { 20.0 } else { 0.0 })
        .collect()
}

#[derive(Default)]
struct Counter(AtomicUsize);

impl IDriftObserver for Counter {
    fn on_drift_check_completed(&self, _result: &DriftCheckResult) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Panicker;

impl IDriftObserver for Panicker {
    fn on_drift_check_completed(&self, _result: &DriftCheckResult) {
        panic!("observer failure");
    }
}

fn monitor(store: &Arc<MemoryStore>) -> DriftMonitor<MemoryStore> {
    DriftMonitor::new(
        Arc::clone(store),
        DriftDetector::default(),
        MonitorConfig::default(),
    )
}

#[test]
fn sweep_checks_persists_and_notifies() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "drifting", &shifted());
    seed(&store, "stable", &stable());
    let counter = Arc::new(Counter::default());
    let monitor = monitor(&store).with_observer(counter.clone());

    let summary = monitor.sweep_at(now()).unwrap();
    assert_eq!(
        summary.outcome("drifting"),
        Some(&ModelOutcome::Checked {
            drift_detected: true,
            enough_data: true
        })
    );
    assert_eq!(
        summary.outcome("stable"),
        Some(&ModelOutcome::Checked {
            drift_detected: false,
            enough_data: true
        })
    );
    assert_eq!(summary.checked(), 2);
    assert_eq!(summary.drifted(), 1);
    assert_eq!(counter.0.load(Ordering::SeqCst), 2);

    let saved = store.latest_drift_check("drifting").unwrap().unwrap();
    assert_eq!(saved.checked_at, now());
    assert_eq!(saved.drift_detected, YesNo::Yes);
    assert_eq!(saved.enough_data, YesNo::Yes);
    assert!((saved.rmse.unwrap() - 0.5).abs() < 1e-12);
    assert!((saved.mae.unwrap() - 0.5).abs() < 1e-12);

    let metrics = monitor.metrics();
    assert_eq!(metrics.sweeps, 1);
    assert_eq!(metrics.models_checked, 2);
    assert_eq!(metrics.drift_detections, 1);
}

#[test]
fn cooldown_prevents_repeat_checks() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "dock", &stable());
    let monitor = monitor(&store);

    monitor.sweep_at(now()).unwrap();
    let again = monitor.sweep_at(now() + Duration::minutes(30)).unwrap();
    assert_eq!(
        again.outcome("dock"),
        Some(&ModelOutcome::Skipped(SkipReason::CoolingDown))
    );
    assert_eq!(store.drift_checks().len(), 1);

    let later = monitor.sweep_at(now() + Duration::minutes(61)).unwrap();
    assert_eq!(later.checked(), 1);
    assert_eq!(store.drift_checks().len(), 2);
}

#[test]
fn oversized_cooldown_skips_without_panicking() {
    // Fits a chrono::Duration but reaches before the earliest representable date,
    // then one that does not fit at all.
    for cooldown_minutes in [100_000_000_000_000, u64::MAX] {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "dock", &stable());
        let monitor = DriftMonitor::new(
            Arc::clone(&store),
            DriftDetector::default(),
            MonitorConfig {
                cooldown_minutes,
                ..MonitorConfig::default()
            },
        );

        assert_eq!(monitor.sweep_at(now()).unwrap().checked(), 1);
        let again = monitor.sweep_at(now() + Duration::days(3650)).unwrap();
        assert_eq!(
            again.outcome("dock"),
            Some(&ModelOutcome::Skipped(SkipReason::CoolingDown))
        );
        assert_eq!(store.drift_checks().len(), 1);
    }
}

#[test]
fn thin_models_are_skipped_with_reason() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "sparse", &[1.0, 2.0, 3.0, 4.0, 5.0]);
    store.add_predictions([PredictionRecord::new("orphan-1", "unmatched", 1.0)]);
    let monitor = monitor(&store);

    let summary = monitor.sweep_at(now()).unwrap();
    assert_eq!(
        summary.outcome("sparse"),
        Some(&ModelOutcome::Skipped(SkipReason::TooFewPairs))
    );
    assert_eq!(
        summary.outcome("unmatched"),
        Some(&ModelOutcome::Skipped(SkipReason::NoData))
    );
    assert_eq!(summary.skipped(), 2);
    assert!(store.drift_checks().is_empty());
}

#[test]
fn one_failing_model_does_not_stop_the_sweep() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "broken", &stable());
    seed(&store, "healthy", &stable());
    store.fail_model("broken");
    let monitor = monitor(&store);

    let summary = monitor.sweep_at(now()).unwrap();
    assert!(matches!(
        summary.outcome("broken"),
        Some(ModelOutcome::Failed { .. })
    ));
    assert_eq!(summary.checked(), 1);
    assert_eq!(monitor.metrics().models_failed, 1);
    assert!(store.latest_drift_check("healthy").unwrap().is_some());
}

#[test]
fn narrow_windows_are_recorded_as_insufficient() {
    let store = Arc::new(MemoryStore::new());
    // Twelve pairs split 6/6, below the per-window minimum.
    seed(&store, "dock", &stable()[..12]);
    let monitor = monitor(&store);

    let summary = monitor.sweep_at(now()).unwrap();
    assert_eq!(
        summary.outcome("dock"),
        Some(&ModelOutcome::Checked {
            drift_detected: false,
            enough_data: false
        })
    );
    let saved = store.latest_drift_check("dock").unwrap().unwrap();
    assert_eq!(saved.enough_data, YesNo::No);
    assert!(saved.ks_p_value.is_none());
}

#[test]
fn panicking_observer_does_not_fail_the_model() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "dock", &shifted());
    let counter = Arc::new(Counter::default());
    let monitor = monitor(&store)
        .with_observer(Arc::new(Panicker))
        .with_observer(counter.clone());

    let summary = monitor.sweep_at(now()).unwrap();
    assert_eq!(summary.checked(), 1);
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}

#[test]
fn broadcast_observer_publishes_checks() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "dock", &shifted());
    let events = Arc::new(BroadcastObserver::new(4));
    let mut rx = events.subscribe();
    let monitor = monitor(&store).with_observer(events);

    monitor.sweep_at(now()).unwrap();
    let published = rx.try_recv().unwrap();
    assert_eq!(published.model_id, "dock");
    assert!(published.drift_detected.is_yes());
}

async fn wait_for_sweeps(monitor: &DriftMonitor<MemoryStore>, n: u64) {
    tokio::time::timeout(StdDuration::from_secs(5), async {
        while monitor.metrics().sweeps < n {
            tokio::time::sleep(StdDuration::from_millis(5)).await;
        }
    })
    .await
    .expect("monitor did not sweep in time");
}

#[tokio::test]
async fn stop_interrupts_the_sleep() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "dock", &stable());
    let monitor = Arc::new(monitor(&store));

    let handle = Arc::clone(&monitor).start(StdDuration::from_secs(3600));
    wait_for_sweeps(&monitor, 1).await;

    tokio::time::timeout(StdDuration::from_secs(2), handle.stop())
        .await
        .expect("stop did not interrupt the sleep");
    assert_eq!(monitor.metrics().sweeps, 1);
    assert_eq!(store.drift_checks().len(), 1);
}

#[tokio::test]
async fn loop_repeats_on_interval() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "dock", &stable());
    let monitor = Arc::new(monitor(&store));

    let handle = Arc::clone(&monitor).start(StdDuration::from_millis(5));
    wait_for_sweeps(&monitor, 3).await;
    handle.stop().await;

    let sweeps = monitor.metrics().sweeps;
    assert!(sweeps >= 3);
    // Later sweeps fall inside the cooldown.
    assert_eq!(store.drift_checks().len(), 1);
    tokio::time::sleep(StdDuration::from_millis(30)).await;
    assert_eq!(monitor.metrics().sweeps, sweeps);
}
