//! Running sweep counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Totals across every sweep since start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorMetrics {
    pub sweeps: u64,
    pub models_checked: u64,
    pub models_skipped: u64,
    pub models_failed: u64,
    /// Checks whose verdict was drift.
    pub drift_detections: u64,
    pub last_sweep_at: Option<DateTime<Utc>>,
    pub last_sweep_ms: u64,
}

impl MonitorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sweep(
        &mut self,
        at: DateTime<Utc>,
        checked: usize,
        skipped: usize,
        failed: usize,
        drifted: usize,
        elapsed_ms: u64,
    ) {
        self.sweeps += 1;
        self.models_checked += checked as u64;
        self.models_skipped += skipped as u64;
        self.models_failed += failed as u64;
        self.drift_detections += drifted as u64;
        self.last_sweep_at = Some(at);
        self.last_sweep_ms = elapsed_ms;
    }

    /// Fraction of checked models that showed drift.
    pub fn drift_rate(&self) -> f64 {
        if self.models_checked == 0 {
            return 0.0;
        }
        self.drift_detections as f64 / self.models_checked as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_across_sweeps() {
        let mut m = MonitorMetrics::new();
        assert_eq!(m.drift_rate(), 0.0);
        let t = Utc::now();
        m.record_sweep(t, 4, 1, 0, 1, 12);
        m.record_sweep(t, 4, 0, 1, 3, 8);
        assert_eq!(m.sweeps, 2);
        assert_eq!(m.models_checked, 8);
        assert_eq!(m.models_failed, 1);
        assert_eq!(m.last_sweep_ms, 8);
        assert_eq!(m.drift_rate(), 0.5);
    }
}
