//! Seams between the pipeline and its collaborators.

mod correction_store;
mod drift_check_store;
mod observer;
mod record_store;

pub use correction_store::ICorrectionStore;
pub use drift_check_store::IDriftCheckStore;
pub use observer::IDriftObserver;
pub use record_store::IRecordStore;
