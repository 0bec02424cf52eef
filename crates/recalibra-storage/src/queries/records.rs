//! Predictions and outcomes: ingestion and retrieval.

use std::collections::BTreeMap;

use rusqlite::{params, params_from_iter, Connection, Row};

use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::models::{AssayContext, OutcomeRecord, PredictionRecord};

use super::{format_ts, parse_opt_ts};
use crate::{corrupt_row, to_storage_err};

/// Insert predictions in one transaction. Non-finite values are rejected
/// before anything is written.
pub fn insert_predictions(conn: &Connection, records: &[PredictionRecord]) -> RecalibraResult<usize> {
    if let Some(bad) = records.iter().find(|r| !r.predicted_value.is_finite()) {
        return Err(RecalibraError::invalid(format!(
            "prediction for {} has non-finite value {}",
            bad.molecule_id, bad.predicted_value
        )));
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO predictions
                    (molecule_id, model_id, predicted_value, reagent_batch,
                     assay_version, instrument_id, observed_at, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        for r in records {
            stmt.execute(params![
                r.molecule_id,
                r.model_id,
                r.predicted_value,
                r.context.reagent_batch,
                r.context.assay_version,
                r.context.instrument_id,
                r.observed_at.as_ref().map(format_ts),
                serde_json::to_string(&r.metadata)?,
            ])
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    Ok(records.len())
}

/// Insert outcomes in one transaction. An outcome whose `source_id` is
/// already stored is skipped. Returns how many rows were written.
pub fn insert_outcomes(conn: &Connection, records: &[OutcomeRecord]) -> RecalibraResult<usize> {
    if let Some(bad) = records.iter().find(|r| !r.measured_value.is_finite()) {
        return Err(RecalibraError::invalid(format!(
            "outcome for {} has non-finite value {}",
            bad.molecule_id, bad.measured_value
        )));
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut written = 0;
    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT OR IGNORE INTO outcomes
                    (molecule_id, source_id, measured_value, reagent_batch,
                     assay_version, instrument_id, observed_at, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        for r in records {
            written += stmt
                .execute(params![
                    r.molecule_id,
                    r.source_id,
                    r.measured_value,
                    r.context.reagent_batch,
                    r.context.assay_version,
                    r.context.instrument_id,
                    r.observed_at.as_ref().map(format_ts),
                    serde_json::to_string(&r.metadata)?,
                ])
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    Ok(written)
}

pub fn list_model_ids(conn: &Connection) -> RecalibraResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT model_id FROM predictions ORDER BY model_id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<String>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Row as stored, before timestamps and metadata are parsed.
struct RawRecord {
    molecule_id: String,
    key: Option<String>,
    value: f64,
    context: AssayContext,
    observed_at: Option<String>,
    metadata: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            molecule_id: row.get(0)?,
            key: row.get(1)?,
            value: row.get(2)?,
            context: AssayContext {
                reagent_batch: row.get(3)?,
                assay_version: row.get(4)?,
                instrument_id: row.get(5)?,
            },
            observed_at: row.get(6)?,
            metadata: row.get(7)?,
        })
    }

    fn parts(
        &self,
        table: &str,
    ) -> RecalibraResult<(
        Option<chrono::DateTime<chrono::Utc>>,
        BTreeMap<String, serde_json::Value>,
    )> {
        let observed_at = parse_opt_ts(table, self.observed_at.as_deref())?;
        let metadata = serde_json::from_str(&self.metadata)
            .map_err(|e| corrupt_row(table, format!("bad metadata: {e}")))?;
        Ok((observed_at, metadata))
    }
}

pub fn fetch_predictions(conn: &Connection, model_id: &str) -> RecalibraResult<Vec<PredictionRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT molecule_id, model_id, predicted_value, reagent_batch,
                    assay_version, instrument_id, observed_at, metadata
             FROM predictions
             WHERE model_id = ?1
             ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![model_id], RawRecord::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        let (observed_at, metadata) = raw.parts("predictions")?;
        out.push(PredictionRecord {
            molecule_id: raw.molecule_id,
            model_id: raw.key.unwrap_or_default(),
            predicted_value: raw.value,
            context: raw.context,
            observed_at,
            metadata,
        });
    }
    Ok(out)
}

/// Outcomes for any of `molecule_ids`, in ingestion order. The caller
/// keeps the id list within SQLite's bound-parameter limit.
pub fn fetch_outcomes(conn: &Connection, molecule_ids: &[String]) -> RecalibraResult<Vec<OutcomeRecord>> {
    if molecule_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; molecule_ids.len()].join(", ");
    let sql = format!(
        "SELECT molecule_id, source_id, measured_value, reagent_batch,
                assay_version, instrument_id, observed_at, metadata
         FROM outcomes
         WHERE molecule_id IN ({placeholders})
         ORDER BY id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(molecule_ids.iter()), RawRecord::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        let (observed_at, metadata) = raw.parts("outcomes")?;
        out.push(OutcomeRecord {
            molecule_id: raw.molecule_id,
            source_id: raw.key,
            measured_value: raw.value,
            context: raw.context,
            observed_at,
            metadata,
        });
    }
    Ok(out)
}
