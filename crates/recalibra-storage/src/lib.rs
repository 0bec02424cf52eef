//! # recalibra-storage
//!
//! SQLite persistence for predictions, outcomes, drift-check history and
//! correction artifacts. One serialized writer, a pool of read-only
//! connections, WAL journaling and `user_version` migrations.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use recalibra_core::errors::{RecalibraError, StorageError};

/// Wrap a SQLite failure message as a workspace error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> RecalibraError {
    RecalibraError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}

/// A stored value that no longer parses into its domain type.
pub(crate) fn corrupt_row(table: &str, details: impl Into<String>) -> RecalibraError {
    RecalibraError::Storage(StorageError::CorruptRow {
        table: table.to_string(),
        details: details.into(),
    })
}
