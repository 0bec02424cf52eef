//! StorageEngine: owns the writer and read pool, implements the record,
//! drift-check and correction stores.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use recalibra_core::config::StorageConfig;
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::models::{CorrectionModel, DriftCheckResult, OutcomeRecord, PredictionRecord};
use recalibra_core::traits::{ICorrectionStore, IDriftCheckStore, IRecordStore};

use crate::migrations;
use crate::pool::pragmas::apply_pragmas;
use crate::pool::ReadPool;
use crate::queries::{corrections, drift_checks, records};
use crate::to_storage_err;

pub struct StorageEngine {
    writer: Mutex<Connection>,
    /// `None` in in-memory mode: a second in-memory connection would be a
    /// separate database, so reads go through the writer.
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl StorageEngine {
    /// Open (creating if needed) a database file with the default pool size.
    pub fn open(path: &Path) -> RecalibraResult<Self> {
        Self::open_with_pool_size(path, StorageConfig::default().read_pool_size)
    }

    pub fn open_with_pool_size(path: &Path, read_pool_size: usize) -> RecalibraResult<Self> {
        let writer = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;
        let readers = ReadPool::open(path, read_pool_size)?;
        debug!(path = %path.display(), readers = readers.size(), "storage opened");
        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_config(config: &StorageConfig) -> RecalibraResult<Self> {
        Self::open_with_pool_size(Path::new(&config.db_path), config.read_pool_size)
    }

    /// In-memory database for tests and one-shot runs.
    pub fn open_in_memory() -> RecalibraResult<Self> {
        let writer = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Database file path (`None` for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> RecalibraResult<u32> {
        self.with_writer(migrations::current_version)
    }

    pub fn insert_predictions(&self, records: &[PredictionRecord]) -> RecalibraResult<usize> {
        self.with_writer(|conn| records::insert_predictions(conn, records))
    }

    /// Returns how many outcomes were new; repeated `source_id`s are skipped.
    pub fn insert_outcomes(&self, records: &[OutcomeRecord]) -> RecalibraResult<usize> {
        self.with_writer(|conn| records::insert_outcomes(conn, records))
    }

    fn with_writer<F, T>(&self, f: F) -> RecalibraResult<T>
    where
        F: FnOnce(&Connection) -> RecalibraResult<T>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| to_storage_err("write lock poisoned"))?;
        f(&guard)
    }

    fn with_reader<F, T>(&self, f: F) -> RecalibraResult<T>
    where
        F: FnOnce(&Connection) -> RecalibraResult<T>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.with_writer(f),
        }
    }
}

impl IRecordStore for StorageEngine {
    fn list_model_ids(&self) -> RecalibraResult<Vec<String>> {
        self.with_reader(records::list_model_ids)
    }

    fn fetch_predictions(&self, model_id: &str) -> RecalibraResult<Vec<PredictionRecord>> {
        self.with_reader(|conn| records::fetch_predictions(conn, model_id))
    }

    fn fetch_outcomes(&self, molecule_ids: &[String]) -> RecalibraResult<Vec<OutcomeRecord>> {
        self.with_reader(|conn| records::fetch_outcomes(conn, molecule_ids))
    }
}

impl IDriftCheckStore for StorageEngine {
    fn save_drift_check(&self, result: &DriftCheckResult) -> RecalibraResult<()> {
        self.with_writer(|conn| drift_checks::insert_drift_check(conn, result))
    }

    fn latest_drift_check(&self, model_id: &str) -> RecalibraResult<Option<DriftCheckResult>> {
        self.with_reader(|conn| drift_checks::latest_drift_check(conn, model_id))
    }

    fn drift_checks_since(
        &self,
        model_id: &str,
        since: DateTime<Utc>,
    ) -> RecalibraResult<Vec<DriftCheckResult>> {
        self.with_reader(|conn| drift_checks::drift_checks_since(conn, model_id, &since))
    }
}

impl ICorrectionStore for StorageEngine {
    fn save_correction_model(&self, model: &CorrectionModel) -> RecalibraResult<()> {
        self.with_writer(|conn| corrections::upsert_correction_model(conn, model))
    }

    fn load_correction_model(&self, model_id: &str) -> RecalibraResult<CorrectionModel> {
        self.with_reader(|conn| corrections::get_correction_model(conn, model_id))?
            .ok_or_else(|| RecalibraError::not_found("correction model", model_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::pragmas::verify_wal_mode;

    #[test]
    fn in_memory_reads_see_writes() {
        let engine = StorageEngine::open_in_memory().unwrap();
        engine
            .insert_predictions(&[PredictionRecord::new("M1", "dock", 1.0)])
            .unwrap();
        assert_eq!(engine.list_model_ids().unwrap(), vec!["dock"]);
        assert!(engine.path().is_none());
    }

    #[test]
    fn file_backed_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StorageEngine::open(&dir.path().join("wal.db")).unwrap();
        assert!(engine.with_writer(verify_wal_mode).unwrap());
        assert_eq!(engine.schema_version().unwrap(), migrations::LATEST_VERSION);
    }
}
