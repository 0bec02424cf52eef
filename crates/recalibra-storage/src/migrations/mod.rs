//! Schema migrations tracked in `PRAGMA user_version`.

mod v001_initial;

use rusqlite::Connection;
use tracing::{debug, info};

use recalibra_core::errors::{RecalibraError, RecalibraResult, StorageError};

use crate::to_storage_err;

/// Ordered `(version, sql)` pairs. Versions start at 1 and never skip.
const MIGRATIONS: &[(u32, &str)] = &[(1, v001_initial::MIGRATION_SQL)];

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

pub fn current_version(conn: &Connection) -> RecalibraResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration above the stored version, each in its own
/// transaction. Returns the resulting version.
pub fn run_migrations(conn: &Connection) -> RecalibraResult<u32> {
    let current = current_version(conn)?;
    if current > LATEST_VERSION {
        return Err(failed(
            current,
            format!("database is at version {current}, newer than {LATEST_VERSION}"),
        ));
    }

    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| failed(version, e.to_string()))?;
        tx.execute_batch(sql).map_err(|e| failed(version, e.to_string()))?;
        tx.pragma_update(None, "user_version", version)
            .map_err(|e| failed(version, e.to_string()))?;
        tx.commit().map_err(|e| failed(version, e.to_string()))?;
        debug!(version, "applied migration");
    }

    if current < LATEST_VERSION {
        info!(from = current, to = LATEST_VERSION, "database schema migrated");
    }
    Ok(LATEST_VERSION)
}

fn failed(version: u32, message: String) -> RecalibraError {
    RecalibraError::Storage(StorageError::MigrationFailed { version, message })
}
