//! In-memory implementation of every store trait, for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use recalibra_core::errors::{RecalibraError, RecalibraResult, StorageError};
use recalibra_core::models::{CorrectionModel, DriftCheckResult, OutcomeRecord, PredictionRecord};
use recalibra_core::traits::{ICorrectionStore, IDriftCheckStore, IRecordStore};

#[derive(Default)]
struct Inner {
    predictions: Vec<PredictionRecord>,
    outcomes: Vec<OutcomeRecord>,
    drift_checks: Vec<DriftCheckResult>,
    corrections: HashMap<String, CorrectionModel>,
    failing_models: HashSet<String>,
    outcome_queries: Vec<usize>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_predictions(&self, records: impl IntoIterator<Item = PredictionRecord>) {
        self.inner.lock().unwrap().predictions.extend(records);
    }

    pub fn add_outcomes(&self, records: impl IntoIterator<Item = OutcomeRecord>) {
        self.inner.lock().unwrap().outcomes.extend(records);
    }

    /// Make `fetch_predictions` fail with a storage error for `model_id`.
    pub fn fail_model(&self, model_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_models
            .insert(model_id.to_string());
    }

    pub fn drift_checks(&self) -> Vec<DriftCheckResult> {
        self.inner.lock().unwrap().drift_checks.clone()
    }

    /// Number of molecule ids passed to each `fetch_outcomes` call.
    pub fn outcome_query_sizes(&self) -> Vec<usize> {
        self.inner.lock().unwrap().outcome_queries.clone()
    }
}

impl IRecordStore for MemoryStore {
    fn list_model_ids(&self) -> RecalibraResult<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let mut ids: Vec<String> = inner.predictions.iter().map(|p| p.model_id.clone()).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn fetch_predictions(&self, model_id: &str) -> RecalibraResult<Vec<PredictionRecord>> {
        let inner = self.inner.lock().unwrap();
        if inner.failing_models.contains(model_id) {
            return Err(StorageError::SqliteError {
                message: format!("injected failure for {model_id}"),
            }
            .into());
        }
        Ok(inner
            .predictions
            .iter()
            .filter(|p| p.model_id == model_id)
            .cloned()
            .collect())
    }

    fn fetch_outcomes(&self, molecule_ids: &[String]) -> RecalibraResult<Vec<OutcomeRecord>> {
        let mut inner = self.inner.lock().unwrap();
        inner.outcome_queries.push(molecule_ids.len());
        let wanted: HashSet<&String> = molecule_ids.iter().collect();
        Ok(inner
            .outcomes
            .iter()
            .filter(|o| wanted.contains(&o.molecule_id))
            .cloned()
            .collect())
    }
}

impl IDriftCheckStore for MemoryStore {
    fn save_drift_check(&self, result: &DriftCheckResult) -> RecalibraResult<()> {
        self.inner.lock().unwrap().drift_checks.push(result.clone());
        Ok(())
    }

    fn latest_drift_check(&self, model_id: &str) -> RecalibraResult<Option<DriftCheckResult>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .drift_checks
            .iter()
            .filter(|c| c.model_id == model_id)
            .max_by_key(|c| c.checked_at)
            .cloned())
    }

    fn drift_checks_since(
        &self,
        model_id: &str,
        since: DateTime<Utc>,
    ) -> RecalibraResult<Vec<DriftCheckResult>> {
        let inner = self.inner.lock().unwrap();
        let mut checks: Vec<DriftCheckResult> = inner
            .drift_checks
            .iter()
            .filter(|c| c.model_id == model_id && c.checked_at >= since)
            .cloned()
            .collect();
        checks.sort_by_key(|c| c.checked_at);
        Ok(checks)
    }
}

impl ICorrectionStore for MemoryStore {
    fn save_correction_model(&self, model: &CorrectionModel) -> RecalibraResult<()> {
        self.inner
            .lock()
            .unwrap()
            .corrections
            .insert(model.model_id.clone(), model.clone());
        Ok(())
    }

    fn load_correction_model(&self, model_id: &str) -> RecalibraResult<CorrectionModel> {
        self.inner
            .lock()
            .unwrap()
            .corrections
            .get(model_id)
            .cloned()
            .ok_or_else(|| RecalibraError::not_found("correction model", model_id))
    }
}
