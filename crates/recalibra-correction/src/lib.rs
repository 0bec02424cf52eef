//! # recalibra-correction
//!
//! Fits a small ridge regression from a model's raw prediction plus its
//! reagent batch and instrument to the measured value, and applies it to
//! new predictions. The fitted function, its category vocabularies and
//! coefficients travel together as one serializable artifact.

pub mod encoder;
pub mod engine;
pub mod function;
pub mod ridge;
pub mod trainer;

pub use encoder::{CategoryVocabulary, CorrectionInput, OneHotEncoder};
pub use engine::CorrectionEngine;
pub use function::CorrectionFunction;
pub use ridge::{fit_ridge, RidgeFit};
pub use trainer::{CorrectionTrainer, TrainedCorrection};
