//! Reconciler: prediction/outcome matching for one model.

use std::collections::HashSet;
use std::sync::Arc;

use recalibra_core::constants::MAX_OUTCOME_QUERY_BATCH;
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::models::{
    MatchKind, OutcomeRecord, PredictionRecord, TrainingFrame, TrainingRow,
};
use recalibra_core::traits::IRecordStore;
use tracing::debug;

use crate::index::LastWins;

/// Builds training frames from a record store.
///
/// Holds no per-call state, so one instance can serve concurrent calls for
/// different models.
pub struct Reconciler<S: ?Sized> {
    store: Arc<S>,
}

impl<S: IRecordStore + ?Sized> Reconciler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Build the training frame for `model_id`.
    ///
    /// Fails with `NoData` when the model has no predictions or none of its
    /// molecules has an outcome. Predictions without a match are dropped,
    /// so the frame may still be empty.
    pub fn build_frame(&self, model_id: &str) -> RecalibraResult<TrainingFrame> {
        let predictions = self.store.fetch_predictions(model_id)?;
        if predictions.is_empty() {
            return Err(RecalibraError::no_data(model_id));
        }

        let molecule_ids = unique_molecules(&predictions);
        let mut outcomes = Vec::new();
        for chunk in molecule_ids.chunks(MAX_OUTCOME_QUERY_BATCH) {
            outcomes.extend(self.store.fetch_outcomes(chunk)?);
        }
        if outcomes.is_empty() {
            return Err(RecalibraError::no_data(model_id));
        }

        let rows = match_records(&predictions, &outcomes);
        debug!(
            model_id,
            predictions = predictions.len(),
            outcomes = outcomes.len(),
            matched = rows.len(),
            "reconciled records"
        );
        Ok(TrainingFrame::new(model_id, rows))
    }
}

fn unique_molecules(predictions: &[PredictionRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    predictions
        .iter()
        .filter(|p| seen.insert(p.molecule_id.as_str()))
        .map(|p| p.molecule_id.clone())
        .collect()
}

/// Pair predictions with outcomes.
///
/// Rule 1 matches on `(molecule_id, assay_version)` with blank and missing
/// versions treated as equal. Rule 2 matches on `molecule_id` alone, only for
/// molecules that produced no rule-1 row, and yields at most one row per
/// molecule. When several records share a key the later one wins. Records
/// with a non-finite value never match.
///
/// Rule-1 rows come first in prediction order, followed by rule-2 rows.
pub fn match_records(
    predictions: &[PredictionRecord],
    outcomes: &[OutcomeRecord],
) -> Vec<TrainingRow> {
    let predictions: Vec<&PredictionRecord> = predictions
        .iter()
        .filter(|p| p.predicted_value.is_finite())
        .collect();
    let outcomes: Vec<&OutcomeRecord> = outcomes
        .iter()
        .filter(|o| o.measured_value.is_finite())
        .collect();

    let preds_by_key: LastWins<(&str, &str), &PredictionRecord> = predictions
        .iter()
        .map(|p| ((p.molecule_id.as_str(), p.context.assay_key()), *p))
        .collect();
    let outcomes_by_key: LastWins<(&str, &str), &OutcomeRecord> = outcomes
        .iter()
        .map(|o| ((o.molecule_id.as_str(), o.context.assay_key()), *o))
        .collect();

    let mut rows = Vec::new();
    let mut matched: HashSet<&str> = HashSet::new();

    for (key, prediction) in preds_by_key.iter() {
        if let Some(outcome) = outcomes_by_key.get(key) {
            rows.push(pair(prediction, outcome, MatchKind::AssayVersion));
            matched.insert(key.0);
        }
    }

    let preds_by_molecule: LastWins<&str, &PredictionRecord> = predictions
        .iter()
        .map(|p| (p.molecule_id.as_str(), *p))
        .collect();
    let outcomes_by_molecule: LastWins<&str, &OutcomeRecord> = outcomes
        .iter()
        .map(|o| (o.molecule_id.as_str(), *o))
        .collect();

    for (molecule, prediction) in preds_by_molecule.iter() {
        if matched.contains(molecule) {
            continue;
        }
        if let Some(outcome) = outcomes_by_molecule.get(molecule) {
            rows.push(pair(prediction, outcome, MatchKind::MoleculeOnly));
        }
    }

    rows
}

fn pair(prediction: &PredictionRecord, outcome: &OutcomeRecord, kind: MatchKind) -> TrainingRow {
    let context = outcome.context.or(&prediction.context);
    TrainingRow {
        molecule_id: prediction.molecule_id.clone(),
        predicted_value: prediction.predicted_value,
        measured_value: outcome.measured_value,
        reagent_batch: context.reagent_batch,
        instrument_id: context.instrument_id,
        assay_version: context.assay_version,
        observed_at: outcome.observed_at.or(prediction.observed_at),
        match_kind: kind,
    }
}
