use recalibra_core::config::ObservabilityConfig;
use recalibra_observability::tracing_setup::{events, init_tracing, init_tracing_with_filter};

#[test]
fn second_init_reports_existing_subscriber() {
    let first = init_tracing_with_filter("debug");
    let config = ObservabilityConfig {
        log_level: "info".into(),
        json_logs: true,
    };
    let second = init_tracing(&config);
    // Only one global subscriber can be installed per process.
    assert!(!(first && second));

    events::drift_check_completed("m", true, true, Some(0.01), Some(0.4));
    events::model_skipped("m", "cooling_down");
    events::model_failed("m", "disk I/O error", false);
    events::correction_trained("m", 25, 0.3, 0.2, 0.9);
    events::sweep_completed(3, 1, 0, 42);
}
