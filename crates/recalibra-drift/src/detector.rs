//! DriftDetector: window split, both tests, OR verdict.

use chrono::{DateTime, Utc};
use recalibra_core::config::DriftConfig;
use recalibra_core::models::{
    DriftCheckResult, DriftTest, MetricSnapshot, SplitStrategy, TrainingFrame, YesNo,
};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::ks::{ks_two_sample, KsResult};
use crate::psi::population_stability_index;
use crate::windows::split_windows;

/// Outcome of one drift comparison.
///
/// When `enough_data` is false the test fields are `None` and
/// `drift_detected` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub enough_data: bool,
    pub drift_detected: bool,
    pub ks: Option<KsResult>,
    pub psi: Option<f64>,
    pub baseline_samples: usize,
    pub recent_samples: usize,
    pub baseline_mean: Option<f64>,
    pub recent_mean: Option<f64>,
    pub split: SplitStrategy,
    pub triggered_tests: Vec<DriftTest>,
}

impl DriftReport {
    /// `None` when there was not enough data to decide.
    pub fn verdict(&self) -> Option<bool> {
        self.enough_data.then_some(self.drift_detected)
    }

    /// Persistable record of this report, with optional whole-frame accuracy.
    pub fn to_check_result(
        &self,
        model_id: &str,
        checked_at: DateTime<Utc>,
        accuracy: Option<&MetricSnapshot>,
    ) -> DriftCheckResult {
        let mut result = DriftCheckResult::new(model_id, checked_at);
        result.drift_detected = YesNo::from(self.drift_detected);
        result.enough_data = YesNo::from(self.enough_data);
        result.ks_statistic = self.ks.map(|k| k.statistic);
        result.ks_p_value = self.ks.map(|k| k.p_value);
        result.psi = self.psi;
        result.baseline_samples = self.baseline_samples;
        result.recent_samples = self.recent_samples;
        result.baseline_mean = self.baseline_mean;
        result.recent_mean = self.recent_mean;
        result.split = Some(self.split);
        result.triggered_tests = self.triggered_tests.clone();
        if let Some(m) = accuracy {
            result.rmse = Some(m.rmse);
            result.mae = Some(m.mae);
            result.r_squared = Some(m.r_squared);
        }
        result
    }
}

/// Stateless drift detector. Safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct DriftDetector {
    config: DriftConfig,
}

impl DriftDetector {
    pub fn new(config: DriftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Compare measured values of the baseline and recent windows.
    pub fn detect(&self, frame: &TrainingFrame) -> DriftReport {
        let windows = split_windows(frame, self.config.cutoff_days);
        let baseline_samples = windows.baseline.len();
        let recent_samples = windows.recent.len();
        let min = self.config.min_window_samples;

        let mut report = DriftReport {
            enough_data: false,
            drift_detected: false,
            ks: None,
            psi: None,
            baseline_samples,
            recent_samples,
            baseline_mean: mean(&windows.baseline),
            recent_mean: mean(&windows.recent),
            split: windows.strategy,
            triggered_tests: Vec::new(),
        };

        if baseline_samples < min || recent_samples < min {
            debug!(
                model_id = %frame.model_id,
                baseline_samples,
                recent_samples,
                min,
                "not enough data for drift check"
            );
            return report;
        }

        let ks = ks_two_sample(&windows.baseline, &windows.recent);
        let psi = population_stability_index(
            &windows.baseline,
            &windows.recent,
            self.config.psi_bins,
        );

        if ks.p_value < self.config.ks_p_value_threshold {
            report.triggered_tests.push(DriftTest::Ks);
        }
        if psi > self.config.psi_threshold {
            report.triggered_tests.push(DriftTest::Psi);
        }

        report.enough_data = true;
        report.drift_detected = !report.triggered_tests.is_empty();
        report.ks = Some(ks);
        report.psi = Some(psi);

        debug!(
            model_id = %frame.model_id,
            ks_statistic = ks.statistic,
            ks_p_value = ks.p_value,
            psi,
            drift_detected = report.drift_detected,
            split = report.split.as_str(),
            "drift check computed"
        );
        report
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.mean())
}
