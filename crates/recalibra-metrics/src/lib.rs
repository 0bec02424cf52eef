//! # recalibra-metrics
//!
//! Accuracy metrics for matched prediction/measurement pairs.

pub mod accuracy;
pub mod bucketing;

pub use accuracy::{coefficient_of_determination, compute_metrics, frame_metrics};
pub use bucketing::{metrics_by_bucket, BucketMetrics, TimeBucket};
