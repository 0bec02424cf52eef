//! Data model: ingested records, the derived training frame, and the
//! persisted drift-check and correction artifacts.

mod correction_model;
mod drift_check;
mod metric_snapshot;
mod records;
mod training_frame;

pub use correction_model::CorrectionModel;
pub use drift_check::{DriftCheckResult, DriftTest, SplitStrategy, YesNo};
pub use metric_snapshot::MetricSnapshot;
pub use records::{AssayContext, OutcomeRecord, PredictionRecord};
pub use training_frame::{MatchKind, TrainingFrame, TrainingRow};
