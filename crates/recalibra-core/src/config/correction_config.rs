use serde::{Deserialize, Serialize};

use super::defaults;

/// Correction trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Matched pairs required before a correction can be fitted.
    pub min_training_samples: usize,
    /// L2 regularization strength of the ridge fit.
    pub ridge_alpha: f64,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            min_training_samples: defaults::DEFAULT_MIN_TRAINING_SAMPLES,
            ridge_alpha: defaults::DEFAULT_RIDGE_ALPHA,
        }
    }
}
