//! Error handling for Recalibra.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod recalibra_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use recalibra_error::{RecalibraError, RecalibraResult};
pub use storage_error::StorageError;
