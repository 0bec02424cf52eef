//! V001: records, drift-check history, correction artifacts.

pub const MIGRATION_SQL: &str = r#"
-- Predictions are append-only; id preserves ingestion order.
CREATE TABLE IF NOT EXISTS predictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    molecule_id TEXT NOT NULL,
    model_id TEXT NOT NULL,
    predicted_value REAL NOT NULL,
    reagent_batch TEXT,
    assay_version TEXT,
    instrument_id TEXT,
    observed_at TEXT,
    metadata TEXT NOT NULL DEFAULT '{}'
) STRICT;

CREATE INDEX IF NOT EXISTS idx_predictions_model ON predictions(model_id);
CREATE INDEX IF NOT EXISTS idx_predictions_molecule ON predictions(molecule_id);

-- source_id deduplicates re-imported measurements. NULLs never collide.
CREATE TABLE IF NOT EXISTS outcomes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    molecule_id TEXT NOT NULL,
    source_id TEXT UNIQUE,
    measured_value REAL NOT NULL,
    reagent_batch TEXT,
    assay_version TEXT,
    instrument_id TEXT,
    observed_at TEXT,
    metadata TEXT NOT NULL DEFAULT '{}'
) STRICT;

CREATE INDEX IF NOT EXISTS idx_outcomes_molecule ON outcomes(molecule_id);

CREATE TABLE IF NOT EXISTS drift_checks (
    check_id TEXT PRIMARY KEY,
    model_id TEXT NOT NULL,
    checked_at TEXT NOT NULL,
    drift_detected TEXT NOT NULL CHECK (drift_detected IN ('YES', 'NO')),
    enough_data TEXT NOT NULL CHECK (enough_data IN ('YES', 'NO')),
    ks_statistic REAL,
    ks_p_value REAL,
    psi REAL,
    baseline_samples INTEGER NOT NULL,
    recent_samples INTEGER NOT NULL,
    baseline_mean REAL,
    recent_mean REAL,
    split TEXT,
    triggered_tests TEXT NOT NULL DEFAULT '[]',
    rmse REAL,
    mae REAL,
    r_squared REAL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_drift_checks_model_time
    ON drift_checks(model_id, checked_at);

-- One current artifact per model; saving replaces it.
CREATE TABLE IF NOT EXISTS correction_models (
    model_id TEXT PRIMARY KEY,
    n_samples INTEGER NOT NULL,
    metrics TEXT NOT NULL,
    artifact TEXT NOT NULL,
    created_at TEXT NOT NULL
) STRICT;
"#;
