use super::{ConfigError, StorageError};

/// Result alias used throughout the workspace.
pub type RecalibraResult<T> = std::result::Result<T, RecalibraError>;

/// Top-level error for every pipeline operation.
///
/// The first four variants are domain outcomes the caller can recover from
/// (sync more data, train first, fix the arguments). None of them may abort
/// a monitoring sweep over other models.
#[derive(Debug, thiserror::Error)]
pub enum RecalibraError {
    #[error("no data for model {model_id}: predictions or outcomes are missing")]
    NoData { model_id: String },

    #[error("insufficient data for {stage}: need {needed} samples, have {actual}")]
    InsufficientData {
        stage: String,
        needed: usize,
        actual: usize,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl RecalibraError {
    pub fn no_data(model_id: impl Into<String>) -> Self {
        Self::NoData {
            model_id: model_id.into(),
        }
    }

    pub fn insufficient(stage: impl Into<String>, needed: usize, actual: usize) -> Self {
        Self::InsufficientData {
            stage: stage.into(),
            needed,
            actual,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// True for outcomes that signal "retry later" rather than a fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoData { .. }
                | Self::InsufficientData { .. }
                | Self::InvalidInput { .. }
                | Self::NotFound { .. }
        )
    }
}

impl From<serde_json::Error> for RecalibraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
