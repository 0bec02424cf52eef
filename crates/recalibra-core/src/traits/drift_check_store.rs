use chrono::{DateTime, Utc};

use crate::errors::RecalibraResult;
use crate::models::DriftCheckResult;

/// Append-only history of drift checks.
pub trait IDriftCheckStore: Send + Sync {
    fn save_drift_check(&self, result: &DriftCheckResult) -> RecalibraResult<()>;

    /// Most recent check for a model by `checked_at`.
    fn latest_drift_check(&self, model_id: &str) -> RecalibraResult<Option<DriftCheckResult>>;

    /// Checks at or after `since`, oldest first.
    fn drift_checks_since(
        &self,
        model_id: &str,
        since: DateTime<Utc>,
    ) -> RecalibraResult<Vec<DriftCheckResult>>;
}
