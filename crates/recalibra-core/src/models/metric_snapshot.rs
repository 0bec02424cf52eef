use serde::{Deserialize, Serialize};

/// Accuracy metrics over a set of predicted/measured pairs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
    pub n_samples: usize,
}
