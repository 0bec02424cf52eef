//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

/// Log a completed drift check.
pub fn drift_check_completed(
    model_id: &str,
    drift_detected: bool,
    enough_data: bool,
    ks_p_value: Option<f64>,
    psi: Option<f64>,
) {
    if drift_detected {
        tracing::warn!(
            event = "drift_check_completed",
            model_id = %model_id,
            drift_detected,
            enough_data,
            ks_p_value = ?ks_p_value,
            psi = ?psi,
            "drift detected"
        );
    } else {
        tracing::info!(
            event = "drift_check_completed",
            model_id = %model_id,
            drift_detected,
            enough_data,
            ks_p_value = ?ks_p_value,
            psi = ?psi,
            "drift check completed"
        );
    }
}

/// Log a model skipped by the periodic driver.
pub fn model_skipped(model_id: &str, reason: &str) {
    tracing::debug!(
        event = "model_skipped",
        model_id = %model_id,
        reason = %reason,
        "model skipped"
    );
}

/// Log a per-model failure. Recoverable failures log at info.
pub fn model_failed(model_id: &str, error: &str, recoverable: bool) {
    if recoverable {
        tracing::info!(
            event = "model_failed",
            model_id = %model_id,
            error = %error,
            recoverable,
            "model check failed"
        );
    } else {
        tracing::warn!(
            event = "model_failed",
            model_id = %model_id,
            error = %error,
            recoverable,
            "model check failed"
        );
    }
}

/// Log a trained and saved correction.
pub fn correction_trained(model_id: &str, n_samples: usize, rmse: f64, mae: f64, r_squared: f64) {
    tracing::info!(
        event = "correction_trained",
        model_id = %model_id,
        n_samples,
        rmse,
        mae,
        r_squared,
        "correction trained"
    );
}

/// Log the end of a sweep over all models.
pub fn sweep_completed(checked: usize, skipped: usize, failed: usize, elapsed_ms: u64) {
    tracing::info!(
        event = "sweep_completed",
        checked,
        skipped,
        failed,
        elapsed_ms,
        "drift sweep completed"
    );
}
