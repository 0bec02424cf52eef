use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Periodic driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Minutes between sweeps.
    pub interval_minutes: u64,
    /// A model checked within this many minutes is skipped.
    pub cooldown_minutes: u64,
    /// Models with fewer matched pairs are skipped.
    pub min_matched_pairs: usize,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    /// `None` when the cooldown does not fit in a `chrono::Duration`.
    pub fn cooldown(&self) -> Option<chrono::Duration> {
        i64::try_from(self.cooldown_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_minutes: defaults::DEFAULT_INTERVAL_MINUTES,
            cooldown_minutes: defaults::DEFAULT_COOLDOWN_MINUTES,
            min_matched_pairs: defaults::DEFAULT_MIN_MATCHED_PAIRS,
        }
    }
}
