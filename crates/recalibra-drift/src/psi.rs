//! Population Stability Index over equal-width bins of the combined range.
//!
//! Bin counts are Laplace-smoothed before they become proportions, so an
//! empty bin on one side contributes in proportion to the evidence against
//! it instead of blowing up through `ln(tiny)`.

/// Pseudo-count added to every bin on both sides.
pub const PSI_LAPLACE_ALPHA: f64 = 0.5;

/// Combined ranges narrower than this carry no distributional signal.
const MIN_RANGE: f64 = 1.0e-10;

/// PSI between `expected` (baseline) and `actual` (recent).
///
/// Bins span `[min, max]` of both samples together; the last bin includes
/// its right edge. Each bin proportion is `(count + α) / (n + α·bins)` with
/// `α = PSI_LAPLACE_ALPHA`. Returns 0.0 when either sample is empty or the
/// combined range is degenerate. Always non-negative.
pub fn population_stability_index(expected: &[f64], actual: &[f64], bins: usize) -> f64 {
    let expected: Vec<f64> = expected.iter().copied().filter(|v| v.is_finite()).collect();
    let actual: Vec<f64> = actual.iter().copied().filter(|v| v.is_finite()).collect();
    if expected.is_empty() || actual.is_empty() || bins == 0 {
        return 0.0;
    }

    let (min, max) = expected
        .iter()
        .chain(actual.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if (max - min).abs() < MIN_RANGE {
        return 0.0;
    }

    let e = smoothed(&histogram(&expected, min, max, bins));
    let a = smoothed(&histogram(&actual, min, max, bins));

    let psi: f64 = e
        .iter()
        .zip(&a)
        .map(|(&pe, &pa)| (pa - pe) * (pa / pe).ln())
        .sum();
    psi.abs()
}

/// Count of `values` in each of `bins` equal-width bins over `[min, max]`.
fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<usize> {
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Laplace-smoothed proportions; every entry is strictly positive.
fn smoothed(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    let denom = total as f64 + PSI_LAPLACE_ALPHA * counts.len() as f64;
    counts
        .iter()
        .map(|&c| (c as f64 + PSI_LAPLACE_ALPHA) / denom)
        .collect()
}
