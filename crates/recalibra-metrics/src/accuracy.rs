//! RMSE / MAE / R².

use recalibra_core::constants::ZERO_VARIANCE_EPSILON;
use recalibra_core::errors::{RecalibraError, RecalibraResult};
use recalibra_core::models::{MetricSnapshot, TrainingFrame};
use statrs::statistics::Statistics;

/// Accuracy of `predicted` against `measured`.
///
/// R² is the squared Pearson correlation, so a constant offset between the
/// two series still scores 1.0. A constant `measured` series gives 1.0; a
/// constant `predicted` series against a varying `measured` gives 0.0.
///
/// Fails with `InvalidInput` when the slices are empty or differ in length.
pub fn compute_metrics(predicted: &[f64], measured: &[f64]) -> RecalibraResult<MetricSnapshot> {
    if predicted.len() != measured.len() {
        return Err(RecalibraError::invalid(format!(
            "predicted has {} values but measured has {}",
            predicted.len(),
            measured.len()
        )));
    }
    if predicted.is_empty() {
        return Err(RecalibraError::invalid("cannot compute metrics on empty input"));
    }

    let n = predicted.len() as f64;
    let (sq_sum, abs_sum) = predicted
        .iter()
        .zip(measured)
        .fold((0.0, 0.0), |(sq, abs), (p, m)| {
            let err = m - p;
            (sq + err * err, abs + err.abs())
        });

    Ok(MetricSnapshot {
        rmse: (sq_sum / n).sqrt(),
        mae: abs_sum / n,
        r_squared: r_squared(predicted, measured),
        n_samples: predicted.len(),
    })
}

/// Standard R², `1 − SS_res / SS_tot`, for fitted values against the
/// targets they were fitted to.
///
/// Unlike the R² in [`compute_metrics`], an offset or scale error lowers the
/// score, and a fit worse than the mean goes negative. Returns 1.0 when
/// `measured` has (near) zero variance. Slices are paired up to the shorter.
pub fn coefficient_of_determination(predicted: &[f64], measured: &[f64]) -> f64 {
    let n = predicted.len().min(measured.len());
    if n == 0 {
        return 1.0;
    }
    let measured = &measured[..n];
    let mean = measured.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = measured.iter().map(|m| (m - mean).powi(2)).sum();
    if ss_tot / (n as f64) < ZERO_VARIANCE_EPSILON {
        return 1.0;
    }
    let ss_res: f64 = predicted
        .iter()
        .zip(measured)
        .map(|(p, m)| (m - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

/// Metrics over every row of a frame.
pub fn frame_metrics(frame: &TrainingFrame) -> RecalibraResult<MetricSnapshot> {
    compute_metrics(&frame.predicted(), &frame.measured())
}

fn r_squared(predicted: &[f64], measured: &[f64]) -> f64 {
    let var_measured = measured.iter().population_variance();
    if var_measured < ZERO_VARIANCE_EPSILON {
        return 1.0;
    }
    let var_predicted = predicted.iter().population_variance();
    if var_predicted < ZERO_VARIANCE_EPSILON {
        return 0.0;
    }
    let cov = predicted.iter().population_covariance(measured.iter());
    let r2 = (cov * cov) / (var_predicted * var_measured);
    if r2.is_finite() {
        r2.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
