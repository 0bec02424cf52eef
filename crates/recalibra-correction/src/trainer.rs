//! CorrectionTrainer: frame in, fitted correction out.

use chrono::{DateTime, Utc};
use recalibra_core::config::CorrectionConfig;
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::models::{CorrectionModel, MetricSnapshot, TrainingFrame, TrainingRow};
use recalibra_metrics::{coefficient_of_determination, compute_metrics};
use tracing::debug;

use crate::encoder::{CorrectionInput, OneHotEncoder};
use crate::function::CorrectionFunction;
use crate::ridge::fit_ridge;

/// A fitted correction with its in-sample accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedCorrection {
    pub function: CorrectionFunction,
    /// Accuracy of the corrected values on the training rows. `r_squared`
    /// is the standard `1 − SS_res / SS_tot` of the fit.
    pub metrics: MetricSnapshot,
    pub n_samples: usize,
}

impl TrainedCorrection {
    /// Persistable artifact for `model_id`.
    pub fn into_model(self, model_id: &str) -> RecalibraResult<CorrectionModel> {
        Ok(CorrectionModel {
            model_id: model_id.to_string(),
            n_samples: self.n_samples,
            metrics: self.metrics,
            artifact: self.function.to_artifact()?,
            created_at: self.function.trained_at,
        })
    }
}

/// Fits corrections. Holds only configuration.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTrainer {
    config: CorrectionConfig,
}

impl CorrectionTrainer {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// Fit a correction on every finite row of `frame`.
    ///
    /// Fails with `InsufficientData` below `min_training_samples` rows.
    pub fn train(&self, frame: &TrainingFrame) -> RecalibraResult<TrainedCorrection> {
        self.train_at(frame, Utc::now())
    }

    pub fn train_at(
        &self,
        frame: &TrainingFrame,
        trained_at: DateTime<Utc>,
    ) -> RecalibraResult<TrainedCorrection> {
        let rows: Vec<TrainingRow> = frame
            .rows()
            .iter()
            .filter(|r| r.predicted_value.is_finite() && r.measured_value.is_finite())
            .cloned()
            .collect();

        let needed = self.config.min_training_samples;
        if rows.len() < needed {
            return Err(RecalibraError::insufficient(
                "correction training",
                needed,
                rows.len(),
            ));
        }

        let encoder = OneHotEncoder::fit(&rows);
        let inputs: Vec<CorrectionInput> = rows.iter().map(CorrectionInput::from).collect();
        let x: Vec<Vec<f64>> = inputs.iter().map(|i| encoder.encode(i)).collect();
        let y: Vec<f64> = rows.iter().map(|r| r.measured_value).collect();

        let fit = fit_ridge(&x, &y, self.config.ridge_alpha)?;
        let corrected: Vec<f64> = x.iter().map(|row| fit.predict(row)).collect();
        let mut metrics = compute_metrics(&corrected, &y)?;
        metrics.r_squared = coefficient_of_determination(&corrected, &y);

        let function = CorrectionFunction::new(encoder, fit, self.config.ridge_alpha, trained_at);

        debug!(
            model_id = %frame.model_id,
            n_samples = rows.len(),
            features = function.feature_names.len(),
            rmse = metrics.rmse,
            "correction fitted"
        );

        Ok(TrainedCorrection {
            function,
            metrics,
            n_samples: rows.len(),
        })
    }
}
