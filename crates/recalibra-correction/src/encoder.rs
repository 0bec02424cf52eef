//! One-hot encoding of the categorical context fields.

use std::collections::BTreeSet;

use recalibra_core::constants::UNKNOWN_CATEGORY;
use recalibra_core::models::TrainingRow;
use serde::{Deserialize, Serialize};

/// One row to correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionInput {
    pub predicted_value: f64,
    #[serde(default)]
    pub reagent_batch: Option<String>,
    #[serde(default)]
    pub instrument_id: Option<String>,
}

impl CorrectionInput {
    pub fn new(predicted_value: f64) -> Self {
        Self {
            predicted_value,
            reagent_batch: None,
            instrument_id: None,
        }
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.reagent_batch = Some(batch.into());
        self
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument_id = Some(instrument.into());
        self
    }
}

impl From<&TrainingRow> for CorrectionInput {
    fn from(row: &TrainingRow) -> Self {
        Self {
            predicted_value: row.predicted_value,
            reagent_batch: row.reagent_batch.clone(),
            instrument_id: row.instrument_id.clone(),
        }
    }
}

/// Missing or blank categories become `"unknown"`.
pub fn impute(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN_CATEGORY,
    }
}

/// Sorted category list for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub field: String,
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    pub fn fit<'a>(field: &str, values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let categories: BTreeSet<String> = values
            .into_iter()
            .map(|v| impute(v).to_string())
            .collect();
        Self {
            field: field.to_string(),
            categories: categories.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Append this field's one-hot block. Unseen categories append zeros.
    pub fn encode_into(&self, value: Option<&str>, out: &mut Vec<f64>) {
        let start = out.len();
        out.resize(start + self.categories.len(), 0.0);
        let key = impute(value);
        if let Ok(idx) = self.categories.binary_search_by(|c| c.as_str().cmp(key)) {
            out[start + idx] = 1.0;
        }
    }

    fn feature_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(move |c| format!("{}={}", self.field, c))
    }
}

/// Predicted value passed through, followed by one-hot blocks for the
/// reagent batch and the instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub reagent_batch: CategoryVocabulary,
    pub instrument_id: CategoryVocabulary,
}

impl OneHotEncoder {
    pub fn fit(rows: &[TrainingRow]) -> Self {
        Self {
            reagent_batch: CategoryVocabulary::fit(
                "reagent_batch",
                rows.iter().map(|r| r.reagent_batch.as_deref()),
            ),
            instrument_id: CategoryVocabulary::fit(
                "instrument_id",
                rows.iter().map(|r| r.instrument_id.as_deref()),
            ),
        }
    }

    /// Length of every encoded feature vector.
    pub fn width(&self) -> usize {
        1 + self.reagent_batch.len() + self.instrument_id.len()
    }

    pub fn encode(&self, input: &CorrectionInput) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());
        out.push(input.predicted_value);
        self.reagent_batch
            .encode_into(input.reagent_batch.as_deref(), &mut out);
        self.instrument_id
            .encode_into(input.instrument_id.as_deref(), &mut out);
        out
    }

    pub fn feature_names(&self) -> Vec<String> {
        std::iter::once("predicted_value".to_string())
            .chain(self.reagent_batch.feature_names())
            .chain(self.instrument_id.feature_names())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> CategoryVocabulary {
        CategoryVocabulary::fit("reagent_batch", [Some("B2"), None, Some("B1"), Some("B2"), Some(" ")])
    }

    #[test]
    fn vocabulary_is_sorted_and_imputed() {
        assert_eq!(vocab().categories, vec!["B1", "B2", "unknown"]);
    }

    #[test]
    fn known_category_sets_one_slot() {
        let mut out = vec![9.0];
        vocab().encode_into(Some("B2"), &mut out);
        assert_eq!(out, vec![9.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn missing_value_encodes_as_unknown() {
        let mut out = Vec::new();
        vocab().encode_into(None, &mut out);
        assert_eq!(out, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn unseen_category_is_all_zero() {
        let mut out = Vec::new();
        vocab().encode_into(Some("B99"), &mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn unseen_missing_value_is_all_zero_when_unknown_never_trained() {
        let v = CategoryVocabulary::fit("instrument_id", [Some("I1")]);
        let mut out = Vec::new();
        v.encode_into(None, &mut out);
        assert_eq!(out, vec![0.0]);
    }

    #[test]
    fn feature_names_follow_layout() {
        let enc = OneHotEncoder {
            reagent_batch: CategoryVocabulary::fit("reagent_batch", [Some("B1")]),
            instrument_id: CategoryVocabulary::fit("instrument_id", [Some("I1"), Some("I2")]),
        };
        assert_eq!(enc.width(), 4);
        assert_eq!(
            enc.feature_names(),
            vec![
                "predicted_value",
                "reagent_batch=B1",
                "instrument_id=I1",
                "instrument_id=I2"
            ]
        );
        let x = enc.encode(&CorrectionInput::new(2.5).with_batch("B1").with_instrument("I2"));
        assert_eq!(x, vec![2.5, 1.0, 0.0, 1.0]);
    }
}
