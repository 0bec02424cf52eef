// Single source of truth for all default values.

// --- Drift ---
pub const DEFAULT_KS_P_VALUE_THRESHOLD: f64 = 0.05;
pub const DEFAULT_PSI_THRESHOLD: f64 = 0.25;
pub const DEFAULT_CUTOFF_DAYS: u32 = 30;
pub const DEFAULT_MIN_WINDOW_SAMPLES: usize = 10;
pub const DEFAULT_PSI_BINS: usize = 10;
pub const MAX_CUTOFF_DAYS: u32 = 36_500; // 100 years

// --- Correction ---
pub const DEFAULT_MIN_TRAINING_SAMPLES: usize = 10;
pub const DEFAULT_RIDGE_ALPHA: f64 = 1.0;

// --- Monitor ---
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;
pub const DEFAULT_COOLDOWN_MINUTES: u64 = 60; // 1 hour
pub const DEFAULT_MIN_MATCHED_PAIRS: usize = 10;
pub const MAX_SCHEDULE_MINUTES: u64 = 525_600; // 1 year

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "recalibra.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
