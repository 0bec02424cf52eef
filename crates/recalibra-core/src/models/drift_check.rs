//! Persisted outcome of one drift check.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RecalibraError;

/// Boolean stored as `YES` / `NO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = RecalibraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            other => Err(RecalibraError::invalid(format!(
                "expected YES or NO, got {other:?}"
            ))),
        }
    }
}

/// A distribution test that can trigger a drift verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftTest {
    Ks,
    Psi,
}

impl DriftTest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ks => "ks",
            Self::Psi => "psi",
        }
    }
}

impl FromStr for DriftTest {
    type Err = RecalibraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ks" => Ok(Self::Ks),
            "psi" => Ok(Self::Psi),
            other => Err(RecalibraError::invalid(format!("unknown drift test {other:?}"))),
        }
    }
}

/// How a frame was divided into baseline and recent windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Fixed cutoff of N days before the latest timestamp.
    TimeCutoff,
    /// 50/50 split by row count after sorting.
    IndexHalves,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeCutoff => "time_cutoff",
            Self::IndexHalves => "index_halves",
        }
    }
}

impl FromStr for SplitStrategy {
    type Err = RecalibraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time_cutoff" => Ok(Self::TimeCutoff),
            "index_halves" => Ok(Self::IndexHalves),
            other => Err(RecalibraError::invalid(format!(
                "unknown split strategy {other:?}"
            ))),
        }
    }
}

/// One drift check for one model. Created once, never updated.
///
/// When `enough_data` is `No` the test statistics are absent and
/// `drift_detected` is `No`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftCheckResult {
    pub check_id: String,
    pub model_id: String,
    pub checked_at: DateTime<Utc>,
    pub drift_detected: YesNo,
    pub enough_data: YesNo,
    pub ks_statistic: Option<f64>,
    pub ks_p_value: Option<f64>,
    pub psi: Option<f64>,
    pub baseline_samples: usize,
    pub recent_samples: usize,
    pub baseline_mean: Option<f64>,
    pub recent_mean: Option<f64>,
    pub split: Option<SplitStrategy>,
    #[serde(default)]
    pub triggered_tests: Vec<DriftTest>,
    /// Accuracy of the model on the whole frame at check time.
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
    pub r_squared: Option<f64>,
}

impl DriftCheckResult {
    /// Empty result for `model_id` stamped now with a fresh id.
    pub fn new(model_id: impl Into<String>, checked_at: DateTime<Utc>) -> Self {
        Self {
            check_id: uuid::Uuid::new_v4().to_string(),
            model_id: model_id.into(),
            checked_at,
            drift_detected: YesNo::No,
            enough_data: YesNo::No,
            ks_statistic: None,
            ks_p_value: None,
            psi: None,
            baseline_samples: 0,
            recent_samples: 0,
            baseline_mean: None,
            recent_mean: None,
            split: None,
            triggered_tests: Vec::new(),
            rmse: None,
            mae: None,
            r_squared: None,
        }
    }
}
