use crate::errors::RecalibraResult;
use crate::models::{OutcomeRecord, PredictionRecord};

/// Read access to ingested predictions and outcomes.
pub trait IRecordStore: Send + Sync {
    /// Every model id that has at least one prediction.
    fn list_model_ids(&self) -> RecalibraResult<Vec<String>>;

    /// All predictions for a model, in insertion order.
    fn fetch_predictions(&self, model_id: &str) -> RecalibraResult<Vec<PredictionRecord>>;

    /// All outcomes for the given molecules, in insertion order.
    fn fetch_outcomes(&self, molecule_ids: &[String]) -> RecalibraResult<Vec<OutcomeRecord>>;
}
