//! Two-sample Kolmogorov–Smirnov test.
//!
//! The p-value uses the asymptotic Kolmogorov distribution with Stephens'
//! small-sample correction to the effective sample size.

use serde::{Deserialize, Serialize};

/// Relative tolerance between successive series terms.
const SERIES_EPS_TERM: f64 = 0.001;
/// Relative tolerance against the running sum.
const SERIES_EPS_SUM: f64 = 1.0e-8;
const SERIES_MAX_TERMS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsResult {
    /// Largest distance between the two empirical CDFs, in [0, 1].
    pub statistic: f64,
    pub p_value: f64,
}

impl KsResult {
    /// Result used when either sample is empty.
    pub const NO_EVIDENCE: KsResult = KsResult {
        statistic: 0.0,
        p_value: 1.0,
    };
}

/// Compare two samples. Non-finite values are ignored.
pub fn ks_two_sample(a: &[f64], b: &[f64]) -> KsResult {
    let a = sorted_finite(a);
    let b = sorted_finite(b);
    if a.is_empty() || b.is_empty() {
        return KsResult::NO_EVIDENCE;
    }

    let statistic = ks_statistic(&a, &b);
    let (n, m) = (a.len() as f64, b.len() as f64);
    let en = (n * m / (n + m)).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * statistic;

    KsResult {
        statistic,
        p_value: kolmogorov_survival(lambda),
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Sup-norm distance between the empirical CDFs of two sorted samples.
/// Tied values advance both CDFs together.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (n, m) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;

    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    d
}

/// Q_KS(λ) = 2 Σ (-1)^(j-1) exp(-2 j² λ²), clamped to [0, 1].
/// Returns 1.0 when λ is not positive or the series fails to converge.
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda.is_nan() || lambda <= 0.0 {
        return 1.0;
    }
    let a2 = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;

    for j in 1..=SERIES_MAX_TERMS {
        let jf = f64::from(j);
        let term = sign * (a2 * jf * jf).exp();
        sum += term;
        if term.abs() <= SERIES_EPS_TERM * previous || term.abs() <= SERIES_EPS_SUM * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous = term.abs();
    }
    1.0
}
