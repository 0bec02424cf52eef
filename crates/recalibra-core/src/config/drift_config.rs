use serde::{Deserialize, Serialize};

use super::defaults;

/// Drift detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriftConfig {
    /// Drift is declared when the KS p-value falls below this.
    pub ks_p_value_threshold: f64,
    /// Drift is declared when PSI exceeds this.
    pub psi_threshold: f64,
    /// Rows within this many days of the latest timestamp form the recent window.
    pub cutoff_days: u32,
    /// Minimum rows required in each window.
    pub min_window_samples: usize,
    /// Number of histogram bins for PSI.
    pub psi_bins: usize,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            ks_p_value_threshold: defaults::DEFAULT_KS_P_VALUE_THRESHOLD,
            psi_threshold: defaults::DEFAULT_PSI_THRESHOLD,
            cutoff_days: defaults::DEFAULT_CUTOFF_DAYS,
            min_window_samples: defaults::DEFAULT_MIN_WINDOW_SAMPLES,
            psi_bins: defaults::DEFAULT_PSI_BINS,
        }
    }
}
