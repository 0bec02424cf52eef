//! # recalibra-drift
//!
//! Splits a training frame into baseline and recent windows and compares
//! their measured-value distributions with a two-sample Kolmogorov–Smirnov
//! test and the Population Stability Index. Either test alone can flag drift.

pub mod detector;
pub mod ks;
pub mod psi;
pub mod windows;

pub use detector::{DriftDetector, DriftReport};
pub use ks::{ks_two_sample, KsResult};
pub use psi::population_stability_index;
pub use windows::{split_windows, Windows};
