//! Ingested prediction and outcome records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context fields shared by predictions and outcomes.
/// Blank strings are treated the same as absent values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssayContext {
    #[serde(default)]
    pub reagent_batch: Option<String>,
    #[serde(default)]
    pub assay_version: Option<String>,
    #[serde(default)]
    pub instrument_id: Option<String>,
}

impl AssayContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reagent_batch(mut self, batch: impl Into<String>) -> Self {
        self.reagent_batch = Some(batch.into());
        self
    }

    pub fn with_assay_version(mut self, version: impl Into<String>) -> Self {
        self.assay_version = Some(version.into());
        self
    }

    pub fn with_instrument_id(mut self, instrument: impl Into<String>) -> Self {
        self.instrument_id = Some(instrument.into());
        self
    }

    /// Trimmed copy with blank values collapsed to `None`.
    pub fn normalized(&self) -> Self {
        Self {
            reagent_batch: non_blank(self.reagent_batch.as_deref()),
            assay_version: non_blank(self.assay_version.as_deref()),
            instrument_id: non_blank(self.instrument_id.as_deref()),
        }
    }

    /// Field-wise merge: values from `self` win, `fallback` fills the gaps.
    pub fn or(&self, fallback: &AssayContext) -> Self {
        let own = self.normalized();
        let other = fallback.normalized();
        Self {
            reagent_batch: own.reagent_batch.or(other.reagent_batch),
            assay_version: own.assay_version.or(other.assay_version),
            instrument_id: own.instrument_id.or(other.instrument_id),
        }
    }

    /// Assay version used as a match key. Absent and blank are both `""`.
    pub fn assay_key(&self) -> &str {
        self.assay_version
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A model's prediction for one molecule. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub molecule_id: String,
    pub model_id: String,
    pub predicted_value: f64,
    #[serde(default, flatten)]
    pub context: AssayContext,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PredictionRecord {
    pub fn new(
        molecule_id: impl Into<String>,
        model_id: impl Into<String>,
        predicted_value: f64,
    ) -> Self {
        Self {
            molecule_id: molecule_id.into(),
            model_id: model_id.into(),
            predicted_value,
            context: AssayContext::default(),
            observed_at: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, context: AssayContext) -> Self {
        self.context = context;
        self
    }

    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A laboratory measurement for one molecule. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeRecord {
    pub molecule_id: String,
    /// External identifier used to deduplicate re-imported measurements.
    #[serde(default)]
    pub source_id: Option<String>,
    pub measured_value: f64,
    #[serde(default, flatten)]
    pub context: AssayContext,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl OutcomeRecord {
    pub fn new(molecule_id: impl Into<String>, measured_value: f64) -> Self {
        Self {
            molecule_id: molecule_id.into(),
            source_id: None,
            measured_value,
            context: AssayContext::default(),
            observed_at: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_context(mut self, context: AssayContext) -> Self {
        self.context = context;
        self
    }

    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
