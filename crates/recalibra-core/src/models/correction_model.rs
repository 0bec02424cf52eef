use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MetricSnapshot;

/// The current correction artifact for a model.
///
/// `artifact` is the serialized regression function. Storage treats it as
/// opaque JSON; only the correction crate interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionModel {
    pub model_id: String,
    pub n_samples: usize,
    pub metrics: MetricSnapshot,
    pub artifact: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
