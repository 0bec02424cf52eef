//! Append-only drift-check history.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use recalibra_core::errors::RecalibraResult;
use recalibra_core::models::{DriftCheckResult, DriftTest, SplitStrategy, YesNo};

use super::{format_ts, parse_ts};
use crate::{corrupt_row, to_storage_err};

const TABLE: &str = "drift_checks";

const COLUMNS: &str = "check_id, model_id, checked_at, drift_detected, enough_data,
    ks_statistic, ks_p_value, psi, baseline_samples, recent_samples,
    baseline_mean, recent_mean, split, triggered_tests, rmse, mae, r_squared";

pub fn insert_drift_check(conn: &Connection, r: &DriftCheckResult) -> RecalibraResult<()> {
    let triggered: Vec<&str> = r.triggered_tests.iter().map(DriftTest::as_str).collect();
    conn.execute(
        &format!(
            "INSERT INTO drift_checks ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
        ),
        params![
            r.check_id,
            r.model_id,
            format_ts(&r.checked_at),
            r.drift_detected.as_str(),
            r.enough_data.as_str(),
            r.ks_statistic,
            r.ks_p_value,
            r.psi,
            r.baseline_samples as i64,
            r.recent_samples as i64,
            r.baseline_mean,
            r.recent_mean,
            r.split.map(|s| s.as_str()),
            serde_json::to_string(&triggered)?,
            r.rmse,
            r.mae,
            r.r_squared,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn latest_drift_check(conn: &Connection, model_id: &str) -> RecalibraResult<Option<DriftCheckResult>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM drift_checks
                 WHERE model_id = ?1
                 ORDER BY checked_at DESC, rowid DESC
                 LIMIT 1"
            ),
            params![model_id],
            RawDriftCheck::from_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(RawDriftCheck::into_result).transpose()
}

/// Checks at or after `since`, oldest first.
pub fn drift_checks_since(
    conn: &Connection,
    model_id: &str,
    since: &DateTime<Utc>,
) -> RecalibraResult<Vec<DriftCheckResult>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM drift_checks
             WHERE model_id = ?1 AND checked_at >= ?2
             ORDER BY checked_at ASC, rowid ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![model_id, format_ts(since)], RawDriftCheck::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?.into_result()?);
    }
    Ok(out)
}

struct RawDriftCheck {
    check_id: String,
    model_id: String,
    checked_at: String,
    drift_detected: String,
    enough_data: String,
    ks_statistic: Option<f64>,
    ks_p_value: Option<f64>,
    psi: Option<f64>,
    baseline_samples: i64,
    recent_samples: i64,
    baseline_mean: Option<f64>,
    recent_mean: Option<f64>,
    split: Option<String>,
    triggered_tests: String,
    rmse: Option<f64>,
    mae: Option<f64>,
    r_squared: Option<f64>,
}

impl RawDriftCheck {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            check_id: row.get(0)?,
            model_id: row.get(1)?,
            checked_at: row.get(2)?,
            drift_detected: row.get(3)?,
            enough_data: row.get(4)?,
            ks_statistic: row.get(5)?,
            ks_p_value: row.get(6)?,
            psi: row.get(7)?,
            baseline_samples: row.get(8)?,
            recent_samples: row.get(9)?,
            baseline_mean: row.get(10)?,
            recent_mean: row.get(11)?,
            split: row.get(12)?,
            triggered_tests: row.get(13)?,
            rmse: row.get(14)?,
            mae: row.get(15)?,
            r_squared: row.get(16)?,
        })
    }

    fn into_result(self) -> RecalibraResult<DriftCheckResult> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            corrupt_row(TABLE, format!("check {}: bad {what}: {e}", self.check_id))
        };
        let drift_detected: YesNo = self
            .drift_detected
            .parse()
            .map_err(|e| corrupt("drift_detected", &e))?;
        let enough_data: YesNo = self
            .enough_data
            .parse()
            .map_err(|e| corrupt("enough_data", &e))?;
        let split = self
            .split
            .as_deref()
            .map(str::parse::<SplitStrategy>)
            .transpose()
            .map_err(|e| corrupt("split", &e))?;
        let names: Vec<String> = serde_json::from_str(&self.triggered_tests)
            .map_err(|e| corrupt("triggered_tests", &e))?;
        let triggered_tests = names
            .iter()
            .map(|n| n.parse::<DriftTest>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt("triggered_tests", &e))?;
        let checked_at = parse_ts(TABLE, &self.checked_at)?;

        Ok(DriftCheckResult {
            check_id: self.check_id,
            model_id: self.model_id,
            checked_at,
            drift_detected,
            enough_data,
            ks_statistic: self.ks_statistic,
            ks_p_value: self.ks_p_value,
            psi: self.psi,
            baseline_samples: usize::try_from(self.baseline_samples).unwrap_or_default(),
            recent_samples: usize::try_from(self.recent_samples).unwrap_or_default(),
            baseline_mean: self.baseline_mean,
            recent_mean: self.recent_mean,
            split,
            triggered_tests,
            rmse: self.rmse,
            mae: self.mae,
            r_squared: self.r_squared,
        })
    }
}
