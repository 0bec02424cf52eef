//! # recalibra-monitor
//!
//! Periodic driver: sweeps every known model, runs the drift detector on
//! those with enough matched pairs outside their cooldown, persists each
//! result and notifies observers. One model's failure never aborts a sweep.

pub mod broadcast;
pub mod dispatcher;
pub mod monitor;
pub mod sweep;

pub use broadcast::BroadcastObserver;
pub use dispatcher::EventDispatcher;
pub use monitor::{DriftMonitor, MonitorHandle};
pub use sweep::{ModelOutcome, ModelReport, SkipReason, SweepSummary};
