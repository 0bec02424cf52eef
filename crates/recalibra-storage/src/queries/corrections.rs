//! Current correction artifact per model.

use rusqlite::{params, Connection, OptionalExtension};

use recalibra_core::errors::RecalibraResult;
use recalibra_core::models::{CorrectionModel, MetricSnapshot};

use super::{format_ts, parse_ts};
use crate::{corrupt_row, to_storage_err};

const TABLE: &str = "correction_models";

/// Store `model`, replacing any artifact already saved for its model id.
pub fn upsert_correction_model(conn: &Connection, model: &CorrectionModel) -> RecalibraResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO correction_models
            (model_id, n_samples, metrics, artifact, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            model.model_id,
            model.n_samples as i64,
            serde_json::to_string(&model.metrics)?,
            serde_json::to_string(&model.artifact)?,
            format_ts(&model.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_correction_model(conn: &Connection, model_id: &str) -> RecalibraResult<Option<CorrectionModel>> {
    let raw: Option<(i64, String, String, String)> = conn
        .query_row(
            "SELECT n_samples, metrics, artifact, created_at
             FROM correction_models WHERE model_id = ?1",
            params![model_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((n_samples, metrics, artifact, created_at)) = raw else {
        return Ok(None);
    };
    let metrics: MetricSnapshot = serde_json::from_str(&metrics)
        .map_err(|e| corrupt_row(TABLE, format!("{model_id}: bad metrics: {e}")))?;
    let artifact: serde_json::Value = serde_json::from_str(&artifact)
        .map_err(|e| corrupt_row(TABLE, format!("{model_id}: bad artifact: {e}")))?;

    Ok(Some(CorrectionModel {
        model_id: model_id.to_string(),
        n_samples: usize::try_from(n_samples).unwrap_or_default(),
        metrics,
        artifact,
        created_at: parse_ts(TABLE, &created_at)?,
    }))
}
