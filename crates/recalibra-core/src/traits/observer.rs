use crate::models::DriftCheckResult;

/// Receives drift-check events. Implementations must not block for long.
pub trait IDriftObserver: Send + Sync {
    fn on_drift_check_completed(&self, _result: &DriftCheckResult) {}
}
