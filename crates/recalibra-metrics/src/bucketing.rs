//! Calendar-bucketed metrics.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::models::{MetricSnapshot, TrainingFrame};
use serde::{Deserialize, Serialize};

use crate::accuracy::compute_metrics;

/// Calendar grain for bucketing. Boundaries are UTC; weeks start on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Day,
    Week,
    Month,
}

impl TimeBucket {
    /// Start of the bucket containing `ts`.
    pub fn start_of(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        let start = match self {
            Self::Day => date,
            Self::Week => {
                date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::Month => date.with_day(1).unwrap_or(date),
        };
        start.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = RecalibraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(RecalibraError::invalid(format!(
                "unknown time bucket {other:?}, expected day, week or month"
            ))),
        }
    }
}

/// Metrics for one non-empty bucket, labelled by the bucket's start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketMetrics {
    pub bucket_start: DateTime<Utc>,
    pub metrics: MetricSnapshot,
}

/// One metric tuple per non-empty bucket, oldest first.
/// Rows without a timestamp belong to no bucket.
pub fn metrics_by_bucket(
    frame: &TrainingFrame,
    bucket: TimeBucket,
) -> RecalibraResult<Vec<BucketMetrics>> {
    let mut groups: BTreeMap<DateTime<Utc>, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in frame.rows() {
        let Some(ts) = row.observed_at else { continue };
        let (predicted, measured) = groups.entry(bucket.start_of(ts)).or_default();
        predicted.push(row.predicted_value);
        measured.push(row.measured_value);
    }

    groups
        .into_iter()
        .map(|(bucket_start, (predicted, measured))| {
            Ok(BucketMetrics {
                bucket_start,
                metrics: compute_metrics(&predicted, &measured)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn bucket_starts() {
        // 2026-03-05 is a Thursday.
        let ts = at(2026, 3, 5, 17);
        assert_eq!(TimeBucket::Day.start_of(ts), at(2026, 3, 5, 0));
        assert_eq!(TimeBucket::Week.start_of(ts), at(2026, 3, 2, 0));
        assert_eq!(TimeBucket::Month.start_of(ts), at(2026, 3, 1, 0));
    }

    #[test]
    fn week_crosses_month_boundary() {
        // 2026-04-01 is a Wednesday; its week starts Monday 2026-03-30.
        assert_eq!(TimeBucket::Week.start_of(at(2026, 4, 1, 9)), at(2026, 3, 30, 0));
    }

    #[test]
    fn parse_grain() {
        assert_eq!("Week".parse::<TimeBucket>().unwrap(), TimeBucket::Week);
        assert!(matches!(
            "fortnight".parse::<TimeBucket>(),
            Err(RecalibraError::InvalidInput { .. })
        ));
    }
}
