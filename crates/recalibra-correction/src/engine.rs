//! CorrectionEngine: train-and-persist and load-and-apply over a store.

use std::sync::Arc;

use recalibra_core::errors::RecalibraResult;
use recalibra_core::models::{CorrectionModel, TrainingFrame};
use recalibra_core::traits::ICorrectionStore;
use recalibra_observability::events;

use crate::encoder::CorrectionInput;
use crate::function::CorrectionFunction;
use crate::trainer::CorrectionTrainer;

/// Trains, persists and applies corrections for any model id.
///
/// Saving replaces the model's previous artifact. An `apply` racing a
/// `train_and_save` for the same model id may use either artifact.
pub struct CorrectionEngine<S: ?Sized> {
    store: Arc<S>,
    trainer: CorrectionTrainer,
}

impl<S: ICorrectionStore + ?Sized> CorrectionEngine<S> {
    pub fn new(store: Arc<S>, trainer: CorrectionTrainer) -> Self {
        Self { store, trainer }
    }

    /// Fit a correction on `frame` and make it the model's current one.
    pub fn train_and_save(&self, frame: &TrainingFrame) -> RecalibraResult<CorrectionModel> {
        let trained = self.trainer.train(frame)?;
        let model = trained.into_model(&frame.model_id)?;
        self.store.save_correction_model(&model)?;
        events::correction_trained(
            &model.model_id,
            model.n_samples,
            model.metrics.rmse,
            model.metrics.mae,
            model.metrics.r_squared,
        );
        Ok(model)
    }

    /// The model's current correction function.
    /// Fails with `NotFound` when none has been trained.
    pub fn load(&self, model_id: &str) -> RecalibraResult<CorrectionFunction> {
        let model = self.store.load_correction_model(model_id)?;
        CorrectionFunction::from_artifact(&model.artifact)
    }

    /// Corrected values for `inputs`, one per row in order.
    pub fn apply(&self, model_id: &str, inputs: &[CorrectionInput]) -> RecalibraResult<Vec<f64>> {
        let function = self.load(model_id)?;
        Ok(function.correct_batch(inputs))
    }
}
