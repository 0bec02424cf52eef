//! DriftMonitor: one sweep over all models, and the stoppable loop that
//! repeats it.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use recalibra_core::config::MonitorConfig;
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::traits::{IDriftCheckStore, IDriftObserver, IRecordStore};
use recalibra_drift::DriftDetector;
use recalibra_metrics::frame_metrics;
use recalibra_observability::{events, MonitorMetrics};
use recalibra_reconcile::Reconciler;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dispatcher::EventDispatcher;
use crate::sweep::{ModelOutcome, ModelReport, SkipReason, SweepSummary};

/// Periodic drift checker over every model in a store.
///
/// Models are processed one at a time, so two checks of the same model
/// never overlap within one monitor.
pub struct DriftMonitor<S: ?Sized> {
    store: Arc<S>,
    reconciler: Reconciler<S>,
    detector: DriftDetector,
    config: MonitorConfig,
    dispatcher: EventDispatcher,
    metrics: Mutex<MonitorMetrics>,
}

impl<S> DriftMonitor<S>
where
    S: IRecordStore + IDriftCheckStore + ?Sized,
{
    pub fn new(store: Arc<S>, detector: DriftDetector, config: MonitorConfig) -> Self {
        Self {
            reconciler: Reconciler::new(Arc::clone(&store)),
            store,
            detector,
            config,
            dispatcher: EventDispatcher::new(),
            metrics: Mutex::new(MonitorMetrics::new()),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn IDriftObserver>) -> Self {
        self.dispatcher.register(observer);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Counters accumulated over every sweep so far.
    pub fn metrics(&self) -> MonitorMetrics {
        self.metrics
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn sweep(&self) -> RecalibraResult<SweepSummary> {
        self.sweep_at(Utc::now())
    }

    /// Check every model as of `now`.
    ///
    /// Fails only when the model list itself cannot be read; per-model
    /// errors are reported as `ModelOutcome::Failed`.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> RecalibraResult<SweepSummary> {
        let started = Instant::now();
        let model_ids = self.store.list_model_ids()?;

        let mut models = Vec::with_capacity(model_ids.len());
        for model_id in model_ids {
            let outcome = self.check_isolated(&model_id, now);
            if let ModelOutcome::Skipped(reason) = &outcome {
                events::model_skipped(&model_id, reason.as_str());
            }
            models.push(ModelReport { model_id, outcome });
        }

        let summary = SweepSummary {
            started_at: now,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            models,
        };
        events::sweep_completed(
            summary.checked(),
            summary.skipped(),
            summary.failed(),
            summary.elapsed_ms,
        );
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.record_sweep(
                now,
                summary.checked(),
                summary.skipped(),
                summary.failed(),
                summary.drifted(),
                summary.elapsed_ms,
            );
        }
        Ok(summary)
    }

    /// Run one model's check, turning errors and panics into `Failed`.
    fn check_isolated(&self, model_id: &str, now: DateTime<Utc>) -> ModelOutcome {
        match catch_unwind(AssertUnwindSafe(|| self.check_model(model_id, now))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                let error = err.to_string();
                events::model_failed(model_id, &error, err.is_recoverable());
                ModelOutcome::Failed { error }
            }
            Err(_) => {
                let error = "drift check panicked".to_string();
                events::model_failed(model_id, &error, false);
                ModelOutcome::Failed { error }
            }
        }
    }

    fn check_model(&self, model_id: &str, now: DateTime<Utc>) -> RecalibraResult<ModelOutcome> {
        let frame = match self.reconciler.build_frame(model_id) {
            Ok(frame) => frame,
            Err(RecalibraError::NoData { .. }) => return Ok(ModelOutcome::Skipped(SkipReason::NoData)),
            Err(err) => return Err(err),
        };
        if frame.len() < self.config.min_matched_pairs {
            return Ok(ModelOutcome::Skipped(SkipReason::TooFewPairs));
        }

        if let Some(last) = self.store.latest_drift_check(model_id)? {
            // A cooldown reaching past the earliest representable instant covers every check.
            let cooling = match self.config.cooldown().and_then(|c| now.checked_sub_signed(c)) {
                Some(since) => last.checked_at >= since,
                None => true,
            };
            if cooling {
                return Ok(ModelOutcome::Skipped(SkipReason::CoolingDown));
            }
        }

        let report = self.detector.detect(&frame);
        let accuracy = frame_metrics(&frame).ok();
        let result = report.to_check_result(model_id, now, accuracy.as_ref());
        self.store.save_drift_check(&result)?;

        events::drift_check_completed(
            model_id,
            report.drift_detected,
            report.enough_data,
            result.ks_p_value,
            result.psi,
        );
        self.dispatcher.emit_drift_check_completed(&result);

        Ok(ModelOutcome::Checked {
            drift_detected: report.drift_detected,
            enough_data: report.enough_data,
        })
    }
}

impl<S> DriftMonitor<S>
where
    S: IRecordStore + IDriftCheckStore + ?Sized + 'static,
{
    /// Spawn the sweep loop on the current tokio runtime.
    ///
    /// Sweeps run on the blocking pool. The loop sweeps immediately, then
    /// sleeps `interval` between sweeps until stopped. Dropping the handle
    /// also stops it.
    pub fn start(self: Arc<Self>, interval: Duration) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "drift monitor started");
            loop {
                if *stop_rx.borrow() {
                    break;
                }
                let monitor = Arc::clone(&self);
                match tokio::task::spawn_blocking(move || monitor.sweep()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => warn!(error = %err, "drift sweep failed"),
                    Err(err) => warn!(error = %err, "drift sweep task aborted"),
                }
                if *stop_rx.borrow() {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_rx.changed() => break,
                }
            }
            info!("drift monitor stopped");
        });
        MonitorHandle { stop_tx, join }
    }
}

/// Handle to a running monitor loop.
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the loop to stop and wait for it. A sweep already running is
    /// allowed to finish; no new one starts.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(err) = self.join.await {
            warn!(error = %err, "drift monitor task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
