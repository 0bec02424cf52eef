//! Raw SQL operations, one module per table group.

pub mod corrections;
pub mod drift_checks;
pub mod records;

use chrono::{DateTime, SecondsFormat, Utc};

use recalibra_core::errors::RecalibraResult;

use crate::corrupt_row;

/// RFC 3339 with fixed nanosecond width, so text order is time order.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(table: &str, raw: &str) -> RecalibraResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt_row(table, format!("bad timestamp {raw:?}: {e}")))
}

pub(crate) fn parse_opt_ts(table: &str, raw: Option<&str>) -> RecalibraResult<Option<DateTime<Utc>>> {
    raw.map(|r| parse_ts(table, r)).transpose()
}
