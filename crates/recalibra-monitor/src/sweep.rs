//! Per-model outcomes of one sweep.

use std::fmt;

use chrono::{DateTime, Utc};

/// Why a model was not checked this sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No predictions, or none of the model's molecules has an outcome.
    NoData,
    /// Fewer matched pairs than `min_matched_pairs`.
    TooFewPairs,
    /// Checked within the cooldown window.
    CoolingDown,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::TooFewPairs => "too_few_pairs",
            Self::CoolingDown => "cooling_down",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Checked {
        drift_detected: bool,
        enough_data: bool,
    },
    Skipped(SkipReason),
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub model_id: String,
    pub outcome: ModelOutcome,
}

/// Everything one sweep did, in model order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub models: Vec<ModelReport>,
}

impl SweepSummary {
    pub fn checked(&self) -> usize {
        self.count(|o| matches!(o, ModelOutcome::Checked { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ModelOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ModelOutcome::Failed { .. }))
    }

    pub fn drifted(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ModelOutcome::Checked {
                    drift_detected: true,
                    ..
                }
            )
        })
    }

    pub fn outcome(&self, model_id: &str) -> Option<&ModelOutcome> {
        self.models
            .iter()
            .find(|m| m.model_id == model_id)
            .map(|m| &m.outcome)
    }

    fn count(&self, pred: impl Fn(&ModelOutcome) -> bool) -> usize {
        self.models.iter().filter(|m| pred(&m.outcome)).count()
    }
}
