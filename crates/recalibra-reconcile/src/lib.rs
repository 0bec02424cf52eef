//! # recalibra-reconcile
//!
//! Matches predictions to later-arriving outcomes. Exact matches on
//! `(molecule_id, assay_version)` are taken first; molecules left unmatched
//! fall back to a molecule-only match.

mod index;
pub mod reconciler;

pub use reconciler::Reconciler;
