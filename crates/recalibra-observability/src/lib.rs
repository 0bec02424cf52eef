//! # recalibra-observability
//!
//! Tracing subscriber setup, structured log events for pipeline operations,
//! and running counters for the periodic driver.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::MonitorMetrics;
pub use tracing_setup::{events, init_tracing};
