//! MacKinnon (1994) approximate p-values for unit-root and cointegration
//! test statistics.
//!
//! The tables below are the response-surface coefficients for the
//! constant-only ("c") case with `N` = 1 (ADF) and `N` = 2 (two-variable
//! Engle-Granger) integrated variables.
//!
//! MacKinnon, J.G. (1994). "Approximate asymptotic distribution functions
//! for unit-root and cointegration tests." JBES 12, 167-176.

use super::error::StatsError;
use statrs::distribution::{ContinuousCDF, Normal};

/// Above this statistic the p-value is 1
const TAU_MAX: [f64; 2] = [2.74, 0.92];

/// Below this statistic the p-value is 0
const TAU_MIN: [f64; 2] = [-18.83, -18.86];

/// Switch point between the small-p and large-p polynomials
const TAU_STAR: [f64; 2] = [-1.61, -2.62];

/// Small-p polynomial coefficients, ascending powers (already scaled)
const TAU_SMALL_P: [[f64; 3]; 2] = [
    [2.1659, 1.4412, 3.8269e-2],
    [2.92, 1.5012, 3.9796e-2],
];

/// Large-p polynomial coefficients, ascending powers (already scaled)
const TAU_LARGE_P: [[f64; 4]; 2] = [
    [1.7339, 9.3202e-1, -1.2745e-1, -1.0368e-2],
    [2.1945, 6.4695e-1, -2.9198e-1, -4.2377e-2],
];

fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate p-value of a Dickey-Fuller type statistic with a constant
/// term, for `n_vars` integrated variables (1 = ADF, 2 = Engle-Granger pair).
pub fn mackinnon_p_value(statistic: f64, n_vars: usize) -> Result<f64, StatsError> {
    if statistic.is_nan() {
        return Err(StatsError::NonFinite("test statistic"));
    }
    if !(1..=TAU_MAX.len()).contains(&n_vars) {
        return Err(StatsError::UnsupportedTable { n_vars });
    }
    let idx = n_vars - 1;

    if statistic > TAU_MAX[idx] {
        return Ok(1.0);
    }
    if statistic < TAU_MIN[idx] {
        return Ok(0.0);
    }

    let z = if statistic <= TAU_STAR[idx] {
        polyval(&TAU_SMALL_P[idx], statistic)
    } else {
        polyval(&TAU_LARGE_P[idx], statistic)
    };

    let normal = Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(normal.cdf(z))
}
