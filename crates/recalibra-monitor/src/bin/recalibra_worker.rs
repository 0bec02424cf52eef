//! recalibra-worker: runs the periodic drift monitor against the SQLite
//! store until Ctrl-C.
//!
//! Usage: `recalibra-worker [CONFIG_PATH]`. Without a path, `recalibra.toml`
//! in the working directory is used when present. `RECALIBRA_*` environment
//! variables override both.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use recalibra_core::RecalibraConfig;
use recalibra_drift::DriftDetector;
use recalibra_monitor::{BroadcastObserver, DriftMonitor};
use recalibra_observability::init_tracing;
use recalibra_storage::StorageEngine;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = RecalibraConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_tracing(&config.observability);
    info!(
        version = recalibra_core::constants::VERSION,
        db_path = %config.storage.db_path,
        "recalibra worker starting"
    );

    let store = Arc::new(
        StorageEngine::from_config(&config.storage)
            .with_context(|| format!("opening database {}", config.storage.db_path))?,
    );

    let events = Arc::new(BroadcastObserver::new(256));
    let mut feed = events.subscribe();
    tokio::spawn(async move {
        while let Ok(check) = feed.recv().await {
            if check.drift_detected.is_yes() {
                info!(model_id = %check.model_id, check_id = %check.check_id, "drift alert");
            }
        }
    });

    let monitor = Arc::new(
        DriftMonitor::new(
            store,
            DriftDetector::new(config.drift.clone()),
            config.monitor.clone(),
        )
        .with_observer(events),
    );
    let handle = Arc::clone(&monitor).start(config.monitor.interval());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown requested");
    handle.stop().await;

    let metrics = monitor.metrics();
    info!(
        sweeps = metrics.sweeps,
        models_checked = metrics.models_checked,
        drift_detections = metrics.drift_detections,
        "worker stopped"
    );
    Ok(())
}
