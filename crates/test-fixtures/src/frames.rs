use chrono::{DateTime, Duration, Utc};
use recalibra_core::models::{MatchKind, TrainingFrame, TrainingRow};

/// Fluent builder for hand-written training frames.
pub struct FrameBuilder {
    model_id: String,
    rows: Vec<TrainingRow>,
}

impl FrameBuilder {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn row(self, predicted: f64, measured: f64) -> Self {
        self.row_with(predicted, measured, None, None)
    }

    pub fn row_with(
        mut self,
        predicted: f64,
        measured: f64,
        reagent_batch: Option<&str>,
        instrument_id: Option<&str>,
    ) -> Self {
        let n = self.rows.len();
        self.rows.push(TrainingRow {
            molecule_id: format!("MOL-{n:05}"),
            predicted_value: predicted,
            measured_value: measured,
            reagent_batch: reagent_batch.map(str::to_string),
            instrument_id: instrument_id.map(str::to_string),
            assay_version: None,
            observed_at: None,
            match_kind: MatchKind::AssayVersion,
        });
        self
    }

    /// Timestamp the most recently added row.
    pub fn at(mut self, observed_at: DateTime<Utc>) -> Self {
        if let Some(last) = self.rows.last_mut() {
            last.observed_at = Some(observed_at);
        }
        self
    }

    pub fn build(self) -> TrainingFrame {
        TrainingFrame::new(self.model_id, self.rows)
    }
}

/// Untimed frame from parallel predicted/measured slices.
pub fn frame_from_pairs(model_id: &str, predicted: &[f64], measured: &[f64]) -> TrainingFrame {
    predicted
        .iter()
        .zip(measured)
        .fold(FrameBuilder::new(model_id), |b, (&p, &m)| b.row(p, m))
        .build()
}

/// Frame whose rows are `spacing` apart starting at `start`.
/// Predicted values equal measured values.
pub fn timed_frame(
    model_id: &str,
    start: DateTime<Utc>,
    spacing: Duration,
    measured: &[f64],
) -> TrainingFrame {
    measured
        .iter()
        .enumerate()
        .fold(FrameBuilder::new(model_id), |b, (i, &m)| {
            b.row(m, m).at(start + spacing * i as i32)
        })
        .build()
}
