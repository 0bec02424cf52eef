//! The matched-pair dataset produced by reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which matching rule produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Matched on `(molecule_id, assay_version)`.
    AssayVersion,
    /// Matched on `molecule_id` alone.
    MoleculeOnly,
}

/// One prediction paired with one measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingRow {
    pub molecule_id: String,
    pub predicted_value: f64,
    pub measured_value: f64,
    pub reagent_batch: Option<String>,
    pub instrument_id: Option<String>,
    pub assay_version: Option<String>,
    /// Outcome timestamp when present, otherwise the prediction's.
    pub observed_at: Option<DateTime<Utc>>,
    pub match_kind: MatchKind,
}

impl TrainingRow {
    pub fn residual(&self) -> f64 {
        self.measured_value - self.predicted_value
    }
}

/// Matched pairs for a single model. Lives only for one pipeline call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainingFrame {
    pub model_id: String,
    rows: Vec<TrainingRow>,
}

impl TrainingFrame {
    pub fn new(model_id: impl Into<String>, rows: Vec<TrainingRow>) -> Self {
        Self {
            model_id: model_id.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn predicted(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.predicted_value).collect()
    }

    pub fn measured(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.measured_value).collect()
    }

    /// Number of rows that carry a timestamp.
    pub fn timestamped(&self) -> usize {
        self.rows.iter().filter(|r| r.observed_at.is_some()).count()
    }
}
