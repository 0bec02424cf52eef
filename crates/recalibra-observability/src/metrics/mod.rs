//! Metrics collected by the periodic driver.

mod monitor_metrics;

pub use monitor_metrics::MonitorMetrics;
