//! # recalibra-core
//!
//! Foundation crate for the Recalibra prediction/outcome reconciliation and
//! drift-correction pipeline. Defines the record and frame types, the store
//! and observer traits, the error taxonomy, configuration, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RecalibraConfig;
pub use errors::{RecalibraError, RecalibraResult};
pub use models::{
    AssayContext, CorrectionModel, DriftCheckResult, MetricSnapshot, OutcomeRecord,
    PredictionRecord, TrainingFrame, TrainingRow, YesNo,
};
