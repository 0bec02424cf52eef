//! L2-regularised least squares with an unpenalised intercept.
//!
//! Features and target are centred, `(XᵀX + αI) w = Xᵀy` is solved by
//! Cholesky decomposition, and the intercept is recovered from the means.

use recalibra_core::errors::{RecalibraError, RecalibraResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeFit {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl RidgeFit {
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }
}

/// Fit `y ≈ Xw + b` minimising `‖y − Xw − b‖² + α‖w‖²`.
///
/// Every row of `x` must have the same width. `alpha` must be positive.
pub fn fit_ridge(x: &[Vec<f64>], y: &[f64], alpha: f64) -> RecalibraResult<RidgeFit> {
    if x.is_empty() || x.len() != y.len() {
        return Err(RecalibraError::invalid(format!(
            "ridge needs matching non-empty inputs, got {} rows and {} targets",
            x.len(),
            y.len()
        )));
    }
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(RecalibraError::invalid(format!(
            "ridge alpha must be positive, got {alpha}"
        )));
    }
    let p = x[0].len();
    if x.iter().any(|row| row.len() != p) {
        return Err(RecalibraError::invalid("ridge rows differ in width"));
    }

    let n = x.len() as f64;
    let mut x_mean = vec![0.0; p];
    for row in x {
        for (m, v) in x_mean.iter_mut().zip(row) {
            *m += v / n;
        }
    }
    let y_mean = y.iter().sum::<f64>() / n;

    // Gram matrix of the centred features, row-major p × p.
    let mut gram = vec![0.0; p * p];
    let mut xty = vec![0.0; p];
    let mut centred = vec![0.0; p];
    for (row, &target) in x.iter().zip(y) {
        for (c, (v, m)) in centred.iter_mut().zip(row.iter().zip(&x_mean)) {
            *c = v - m;
        }
        let yc = target - y_mean;
        for i in 0..p {
            xty[i] += centred[i] * yc;
            for j in 0..=i {
                gram[i * p + j] += centred[i] * centred[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            gram[j * p + i] = gram[i * p + j];
        }
        gram[i * p + i] += alpha;
    }

    let coefficients = solve_cholesky(&gram, &xty, p)
        .ok_or_else(|| RecalibraError::invalid("ridge system is not positive definite"))?;
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&x_mean)
            .map(|(w, m)| w * m)
            .sum::<f64>();

    Ok(RidgeFit {
        coefficients,
        intercept,
    })
}

/// Solve `A x = b` for symmetric positive-definite `A` (row-major `n × n`).
fn solve_cholesky(a: &[f64], b: &[f64], n: usize) -> Option<Vec<f64>> {
    // A = L Lᵀ
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if sum.is_nan() || sum <= 0.0 {
                    return None;
                }
                l[i * n + j] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i * n + j] * y[j];
        }
        y[i] = sum / l[i * n + i];
    }

    // Lᵀ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j * n + i] * x[j];
        }
        x[i] = sum / l[i * n + i];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cholesky_solves_small_system() {
        // [[4, 2], [2, 3]] x = [2, 1]  =>  x = [0.5, 0]
        let x = solve_cholesky(&[4.0, 2.0, 2.0, 3.0], &[2.0, 1.0], 2).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn cholesky_rejects_indefinite() {
        assert!(solve_cholesky(&[0.0, 1.0, 1.0, 0.0], &[1.0, 1.0], 2).is_none());
    }

    #[test]
    fn single_feature_matches_closed_form() {
        // Centred x = [-1, 0, 1], y = 2x + 3 => w = Sxy / (Sxx + α) = 4 / (2 + 1)
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![5.0, 7.0, 9.0];
        let fit = fit_ridge(&x, &y, 1.0).unwrap();
        let w = 4.0 / 3.0;
        assert!((fit.coefficients[0] - w).abs() < 1e-12);
        assert!((fit.intercept - (7.0 - w * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn intercept_is_not_shrunk() {
        // A constant target is fitted exactly through the intercept.
        let x = vec![vec![1.0], vec![2.0], vec![4.0]];
        let fit = fit_ridge(&x, &[6.0, 6.0, 6.0], 10.0).unwrap();
        assert!(fit.coefficients[0].abs() < 1e-12);
        assert!((fit.predict(&[100.0]) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_columns_still_solve() {
        let x: Vec<Vec<f64>> = (0..5i32).map(|i| vec![f64::from(i), f64::from(i)]).collect();
        let y: Vec<f64> = (0..5i32).map(|i| f64::from(i) * 2.0).collect();
        let fit = fit_ridge(&x, &y, 1.0).unwrap();
        assert!((fit.coefficients[0] - fit.coefficients[1]).abs() < 1e-9);
    }

    #[test]
    fn zero_alpha_rejected() {
        assert!(fit_ridge(&[vec![1.0]], &[1.0], 0.0).is_err());
    }

    #[test]
    fn mismatched_targets_rejected() {
        assert!(fit_ridge(&[vec![1.0], vec![2.0]], &[1.0], 1.0).is_err());
    }
}
