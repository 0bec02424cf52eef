//! EventDispatcher: fan-out of drift-check events to observers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use recalibra_core::models::DriftCheckResult;
use recalibra_core::traits::IDriftObserver;
use tracing::warn;

/// Synchronous dispatcher over a list of observers.
///
/// An observer that panics is logged and skipped; the rest still receive
/// the event.
#[derive(Default)]
pub struct EventDispatcher {
    observers: Vec<Arc<dyn IDriftObserver>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn IDriftObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn emit_drift_check_completed(&self, result: &DriftCheckResult) {
        self.emit(|o| o.on_drift_check_completed(result));
    }

    fn emit<F: Fn(&dyn IDriftObserver)>(&self, f: F) {
        for (idx, observer) in self.observers.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| f(observer.as_ref()))).is_err() {
                warn!(observer = idx, "drift observer panicked");
            }
        }
    }
}
