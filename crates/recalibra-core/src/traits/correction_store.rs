use crate::errors::RecalibraResult;
use crate::models::CorrectionModel;

/// Storage for the current correction artifact of each model.
///
/// Saving replaces any prior artifact for the same model id (last writer
/// wins). A retrain racing an apply on one model id is not linearizable:
/// the apply may see either artifact.
pub trait ICorrectionStore: Send + Sync {
    fn save_correction_model(&self, model: &CorrectionModel) -> RecalibraResult<()>;

    /// Fails with `NotFound` when nothing has been trained for `model_id`.
    fn load_correction_model(&self, model_id: &str) -> RecalibraResult<CorrectionModel>;
}
