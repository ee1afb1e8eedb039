//! Engle-Granger two-step cointegration test
//!
//! 1. Regress `y` on `x` with an intercept.
//! 2. Run an ADF test (no deterministic terms, AIC lag selection) on the
//!    residuals and map the statistic through the two-variable MacKinnon
//!    surface.

use super::adf::{adf_test, Deterministic};
use super::error::StatsError;
use super::mackinnon::mackinnon_p_value;
use super::ols;
use nalgebra::{DMatrix, DVector};

/// R² at or above `1 - COLLINEAR_TOLERANCE` means the pair is (almost)
/// perfectly collinear and the residual ADF is meaningless.
const COLLINEAR_TOLERANCE: f64 = 100.0 * 1.490_116_119_384_765_6e-8;

/// Outcome of the Engle-Granger test
#[derive(Debug, Clone, PartialEq)]
pub struct EngleGrangerResult {
    /// ADF statistic on the cointegrating residuals
    pub statistic: f64,
    /// MacKinnon approximate p-value (constant, two variables)
    pub p_value: f64,
    /// Intercept of the cointegrating regression
    pub intercept: f64,
    /// Slope of the cointegrating regression
    pub slope: f64,
    /// Lag order used on the residuals, `None` when collinear
    pub used_lag: Option<usize>,
}

/// Test the null of no cointegration between `y` and `x`.
pub fn engle_granger(y: &[f64], x: &[f64]) -> Result<EngleGrangerResult, StatsError> {
    if y.len() != x.len() {
        return Err(StatsError::LengthMismatch {
            left: y.len(),
            right: x.len(),
        });
    }

    let nobs = y.len();
    let design = DMatrix::from_fn(nobs, 2, |r, c| if c == 0 { x[r] } else { 1.0 });
    let fit = ols::fit(&design, &DVector::from_row_slice(y))?;

    if fit.centered_tss == 0.0 {
        return Err(StatsError::ConstantSeries);
    }

    let (statistic, used_lag) = if fit.r_squared() < 1.0 - COLLINEAR_TOLERANCE {
        let adf = adf_test(&fit.residuals, Deterministic::None)?;
        (adf.statistic, Some(adf.used_lag))
    } else {
        (f64::NEG_INFINITY, None)
    };

    Ok(EngleGrangerResult {
        statistic,
        p_value: mackinnon_p_value(statistic, 2)?,
        intercept: fit.params[1],
        slope: fit.params[0],
        used_lag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::testing::{noise, random_walk};

    #[test]
    fn test_identical_series_are_collinear() {
        let x = random_walk(100, 1, 50.0);
        let result = engle_granger(&x, &x).unwrap();
        assert_eq!(result.statistic, f64::NEG_INFINITY);
        assert_eq!(result.p_value, 0.0);
        assert!(result.used_lag.is_none());
    }

    #[test]
    fn test_cointegrated_pair_detected() {
        let x = random_walk(300, 5, 50.0);
        let y: Vec<f64> = x
            .iter()
            .zip(noise(300, 9))
            .map(|(xi, e)| 10.0 + 1.5 * xi + e)
            .collect();

        let result = engle_granger(&y, &x).unwrap();
        assert!(result.p_value < 0.01, "p = {}", result.p_value);
        assert!((result.slope - 1.5).abs() < 0.1);
    }

    #[test]
    fn test_constant_regressor_is_singular() {
        let y = random_walk(50, 2, 10.0);
        let x = vec![3.0; 50];
        assert!(matches!(
            engle_granger(&y, &x),
            Err(StatsError::SingularDesign { .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            engle_granger(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(StatsError::LengthMismatch { .. })
        ));
    }
}
