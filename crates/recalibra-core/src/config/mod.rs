//! Configuration system for Recalibra.
//! TOML-based, 3-layer resolution: env > file > defaults.

pub mod correction_config;
pub mod defaults;
pub mod drift_config;
pub mod monitor_config;
pub mod observability_config;
pub mod recalibra_config;
pub mod storage_config;

pub use correction_config::CorrectionConfig;
pub use drift_config::DriftConfig;
pub use monitor_config::MonitorConfig;
pub use observability_config::ObservabilityConfig;
pub use recalibra_config::RecalibraConfig;
pub use storage_config::StorageConfig;
