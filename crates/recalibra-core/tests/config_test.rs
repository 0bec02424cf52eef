use std::collections::HashMap;
use std::io::Write;

use recalibra_core::config::*;
use recalibra_core::errors::ConfigError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let cfg = RecalibraConfig::default();
    assert_eq!(cfg.drift.ks_p_value_threshold, 0.05);
    assert_eq!(cfg.drift.psi_threshold, 0.25);
    assert_eq!(cfg.drift.cutoff_days, 30);
    assert_eq!(cfg.drift.min_window_samples, 10);
    assert_eq!(cfg.drift.psi_bins, 10);
    assert_eq!(cfg.correction.min_training_samples, 10);
    assert_eq!(cfg.correction.ridge_alpha, 1.0);
    assert_eq!(cfg.monitor.interval_minutes, 60);
    assert_eq!(cfg.monitor.cooldown_minutes, 60);
    assert_eq!(cfg.monitor.min_matched_pairs, 10);
    assert!(cfg.validate().is_ok());
}

#[test]
fn monitor_durations_follow_minutes() {
    let cfg = MonitorConfig::default();
    assert_eq!(cfg.interval(), std::time::Duration::from_secs(3600));
    assert_eq!(cfg.cooldown(), Some(chrono::Duration::hours(1)));
}

#[test]
fn oversized_durations_do_not_overflow() {
    let cfg = MonitorConfig {
        interval_minutes: u64::MAX,
        cooldown_minutes: u64::MAX,
        ..MonitorConfig::default()
    };
    assert_eq!(cfg.interval(), std::time::Duration::from_secs(u64::MAX));
    assert_eq!(cfg.cooldown(), None);

    let cfg = MonitorConfig {
        cooldown_minutes: 525_600,
        ..MonitorConfig::default()
    };
    assert_eq!(cfg.cooldown(), Some(chrono::Duration::days(365)));
}

#[test]
fn partial_toml_keeps_defaults_for_missing_keys() {
    let cfg = RecalibraConfig::from_toml(
        r#"
        [drift]
        psi_threshold = 0.1

        [monitor]
        cooldown_minutes = 5
        "#,
    )
    .unwrap();
    assert_eq!(cfg.drift.psi_threshold, 0.1);
    assert_eq!(cfg.drift.ks_p_value_threshold, 0.05);
    assert_eq!(cfg.monitor.cooldown_minutes, 5);
    assert_eq!(cfg.monitor.interval_minutes, 60);
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = RecalibraConfig::from_toml("[drift\npsi_threshold = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn env_overrides_take_priority_over_file_values() {
    let mut cfg = RecalibraConfig::from_toml("[drift]\npsi_threshold = 0.1\n").unwrap();
    cfg.apply_overrides_from(lookup(&[
        ("RECALIBRA_DRIFT_PSI_THRESHOLD", "0.4"),
        ("RECALIBRA_MONITOR_COOLDOWN_MINUTES", "15"),
        ("RECALIBRA_STORAGE_DB_PATH", "/tmp/other.db"),
        ("RECALIBRA_OBSERVABILITY_JSON_LOGS", "false"),
    ]));
    assert_eq!(cfg.drift.psi_threshold, 0.4);
    assert_eq!(cfg.monitor.cooldown_minutes, 15);
    assert_eq!(cfg.storage.db_path, "/tmp/other.db");
    assert!(!cfg.observability.json_logs);
}

#[test]
fn unparseable_env_values_are_ignored() {
    let mut cfg = RecalibraConfig::default();
    cfg.apply_overrides_from(lookup(&[("RECALIBRA_DRIFT_CUTOFF_DAYS", "a month")]));
    assert_eq!(cfg.drift.cutoff_days, 30);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let cases: Vec<(&str, Box<dyn Fn(&mut RecalibraConfig)>)> = vec![
        ("drift.ks_p_value_threshold", Box::new(|c: &mut RecalibraConfig| c.drift.ks_p_value_threshold = 0.0)),
        ("drift.ks_p_value_threshold", Box::new(|c: &mut RecalibraConfig| c.drift.ks_p_value_threshold = 1.5)),
        ("drift.psi_threshold", Box::new(|c: &mut RecalibraConfig| c.drift.psi_threshold = -0.1)),
        ("drift.cutoff_days", Box::new(|c: &mut RecalibraConfig| c.drift.cutoff_days = 0)),
        ("drift.cutoff_days", Box::new(|c: &mut RecalibraConfig| c.drift.cutoff_days = 200_000_000)),
        ("drift.min_window_samples", Box::new(|c: &mut RecalibraConfig| c.drift.min_window_samples = 1)),
        ("drift.psi_bins", Box::new(|c: &mut RecalibraConfig| c.drift.psi_bins = 1)),
        ("correction.ridge_alpha", Box::new(|c: &mut RecalibraConfig| c.correction.ridge_alpha = 0.0)),
        ("correction.ridge_alpha", Box::new(|c: &mut RecalibraConfig| c.correction.ridge_alpha = f64::NAN)),
        ("monitor.interval_minutes", Box::new(|c: &mut RecalibraConfig| c.monitor.interval_minutes = 0)),
        ("monitor.interval_minutes", Box::new(|c: &mut RecalibraConfig| c.monitor.interval_minutes = u64::MAX)),
        ("monitor.cooldown_minutes", Box::new(|c: &mut RecalibraConfig| c.monitor.cooldown_minutes = u64::MAX)),
    ];
    for (field, mutate) in cases {
        let mut cfg = RecalibraConfig::default();
        mutate(&mut cfg);
        match cfg.validate() {
            Err(ConfigError::ValidationFailed { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation failure for {field}, got {other:?}"),
        }
    }
}

#[test]
fn validate_accepts_upper_bounds() {
    let mut cfg = RecalibraConfig::default();
    cfg.drift.cutoff_days = 36_500;
    cfg.monitor.interval_minutes = 525_600;
    cfg.monitor.cooldown_minutes = 525_600;
    assert!(cfg.validate().is_ok());
}

#[test]
fn to_toml_reloads_to_same_config() {
    let mut cfg = RecalibraConfig::default();
    cfg.drift.cutoff_days = 14;
    cfg.correction.ridge_alpha = 0.5;
    let text = cfg.to_toml().unwrap();
    assert_eq!(RecalibraConfig::from_toml(&text).unwrap(), cfg);
}

#[test]
fn load_reads_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[correction]\nmin_training_samples = 25").unwrap();
    let cfg = RecalibraConfig::load(Some(file.path())).unwrap();
    assert_eq!(cfg.correction.min_training_samples, 25);
}

#[test]
fn load_missing_explicit_file_fails() {
    let err = RecalibraConfig::load(Some(std::path::Path::new(
        "/nonexistent/recalibra.toml",
    )))
    .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}
