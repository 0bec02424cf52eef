//! Top-level Recalibra configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    defaults, CorrectionConfig, DriftConfig, MonitorConfig, ObservabilityConfig, StorageConfig,
};
use crate::errors::ConfigError;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "recalibra.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`RECALIBRA_*`)
/// 2. Config file (`recalibra.toml` or an explicit path)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RecalibraConfig {
    pub drift: DriftConfig,
    pub correction: CorrectionConfig,
    pub monitor: MonitorConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl RecalibraConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit `path` must exist. Without one, `recalibra.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. Missing sections and keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `RECALIBRA_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    /// Pattern: `RECALIBRA_<SECTION>_<FIELD>`. Unparseable values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|v| v.trim().parse().ok())
        }
        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;

        // Drift
        if let Some(v) = parsed(lookup, "RECALIBRA_DRIFT_KS_P_VALUE_THRESHOLD") {
            self.drift.ks_p_value_threshold = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_DRIFT_PSI_THRESHOLD") {
            self.drift.psi_threshold = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_DRIFT_CUTOFF_DAYS") {
            self.drift.cutoff_days = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_DRIFT_MIN_WINDOW_SAMPLES") {
            self.drift.min_window_samples = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_DRIFT_PSI_BINS") {
            self.drift.psi_bins = v;
        }

        // Correction
        if let Some(v) = parsed(lookup, "RECALIBRA_CORRECTION_MIN_TRAINING_SAMPLES") {
            self.correction.min_training_samples = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_CORRECTION_RIDGE_ALPHA") {
            self.correction.ridge_alpha = v;
        }

        // Monitor
        if let Some(v) = parsed(lookup, "RECALIBRA_MONITOR_INTERVAL_MINUTES") {
            self.monitor.interval_minutes = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_MONITOR_COOLDOWN_MINUTES") {
            self.monitor.cooldown_minutes = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_MONITOR_MIN_MATCHED_PAIRS") {
            self.monitor.min_matched_pairs = v;
        }

        // Storage
        if let Some(v) = lookup("RECALIBRA_STORAGE_DB_PATH") {
            self.storage.db_path = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_STORAGE_READ_POOL_SIZE") {
            self.storage.read_pool_size = v;
        }

        // Observability
        if let Some(v) = lookup("RECALIBRA_OBSERVABILITY_LOG_LEVEL") {
            self.observability.log_level = v;
        }
        if let Some(v) = parsed(lookup, "RECALIBRA_OBSERVABILITY_JSON_LOGS") {
            self.observability.json_logs = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn fail(field: &str, message: &str) -> Result<(), ConfigError> {
            Err(ConfigError::ValidationFailed {
                field: field.to_string(),
                message: message.to_string(),
            })
        }

        let ks = self.drift.ks_p_value_threshold;
        if !(ks > 0.0 && ks <= 1.0) {
            return fail("drift.ks_p_value_threshold", "must be in (0.0, 1.0]");
        }
        if !self.drift.psi_threshold.is_finite() || self.drift.psi_threshold < 0.0 {
            return fail("drift.psi_threshold", "must be a non-negative number");
        }
        if self.drift.cutoff_days == 0 {
            return fail("drift.cutoff_days", "must be greater than 0");
        }
        if self.drift.cutoff_days > defaults::MAX_CUTOFF_DAYS {
            return fail("drift.cutoff_days", "must be at most 36500");
        }
        if self.drift.min_window_samples < 2 {
            return fail("drift.min_window_samples", "must be at least 2");
        }
        if self.drift.psi_bins < 2 {
            return fail("drift.psi_bins", "must be at least 2");
        }
        if self.correction.min_training_samples == 0 {
            return fail("correction.min_training_samples", "must be greater than 0");
        }
        let alpha = self.correction.ridge_alpha;
        if !alpha.is_finite() || alpha <= 0.0 {
            return fail("correction.ridge_alpha", "must be a positive number");
        }
        if self.monitor.interval_minutes == 0 {
            return fail("monitor.interval_minutes", "must be greater than 0");
        }
        if self.monitor.interval_minutes > defaults::MAX_SCHEDULE_MINUTES {
            return fail("monitor.interval_minutes", "must be at most 525600");
        }
        if self.monitor.cooldown_minutes > defaults::MAX_SCHEDULE_MINUTES {
            return fail("monitor.cooldown_minutes", "must be at most 525600");
        }
        if self.storage.db_path.trim().is_empty() {
            return fail("storage.db_path", "must not be empty");
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
