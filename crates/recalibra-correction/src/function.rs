//! The fitted correction as a single serializable artifact.

use chrono::{DateTime, Utc};
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use serde::{Deserialize, Serialize};

use crate::encoder::{CorrectionInput, OneHotEncoder};
use crate::ridge::RidgeFit;

/// Bumped when the artifact layout changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Encoder vocabularies plus ridge coefficients.
///
/// `coefficients[i]` weighs `feature_names[i]`; the layout is the encoder's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFunction {
    pub format_version: u32,
    pub encoder: OneHotEncoder,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub alpha: f64,
    pub trained_at: DateTime<Utc>,
}

impl CorrectionFunction {
    pub fn new(encoder: OneHotEncoder, fit: RidgeFit, alpha: f64, trained_at: DateTime<Utc>) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_names: encoder.feature_names(),
            encoder,
            coefficients: fit.coefficients,
            intercept: fit.intercept,
            alpha,
            trained_at,
        }
    }

    /// Corrected value for one row.
    pub fn correct(&self, input: &CorrectionInput) -> f64 {
        let x = self.encoder.encode(input);
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(&x)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }

    /// One corrected value per input, in order.
    pub fn correct_batch(&self, inputs: &[CorrectionInput]) -> Vec<f64> {
        inputs.iter().map(|i| self.correct(i)).collect()
    }

    pub fn to_artifact(&self) -> RecalibraResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse and check a stored artifact.
    pub fn from_artifact(artifact: &serde_json::Value) -> RecalibraResult<Self> {
        let function: Self = serde_json::from_value(artifact.clone())?;
        if function.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(RecalibraError::Serialization {
                reason: format!(
                    "unsupported correction artifact version {} (expected {})",
                    function.format_version, ARTIFACT_FORMAT_VERSION
                ),
            });
        }
        if function.coefficients.len() != function.encoder.width() {
            return Err(RecalibraError::Serialization {
                reason: format!(
                    "correction artifact has {} coefficients for {} features",
                    function.coefficients.len(),
                    function.encoder.width()
                ),
            });
        }
        Ok(function)
    }
}
