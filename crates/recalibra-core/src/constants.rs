/// Recalibra system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Category substituted for a missing reagent batch or instrument id.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Below this variance a distribution is treated as constant.
pub const ZERO_VARIANCE_EPSILON: f64 = 1e-12;

/// Maximum number of molecule ids passed to a single outcome query.
pub const MAX_OUTCOME_QUERY_BATCH: usize = 500;
