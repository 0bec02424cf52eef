//! Observer that republishes drift checks on a tokio broadcast channel.

use recalibra_core::models::DriftCheckResult;
use recalibra_core::traits::IDriftObserver;
use tokio::sync::broadcast;

/// Push channel for drift-check results. Slow subscribers lag and lose
/// the oldest events rather than blocking the sweep.
pub struct BroadcastObserver {
    tx: broadcast::Sender<DriftCheckResult>,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DriftCheckResult> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl IDriftObserver for BroadcastObserver {
    fn on_drift_check_completed(&self, result: &DriftCheckResult) {
        // No subscribers is not an error.
        let _ = self.tx.send(result.clone());
    }
}
