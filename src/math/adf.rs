//! Augmented Dickey-Fuller unit-root test
//!
//! Regresses the first difference of a series on its lagged level and
//! lagged differences:
//!
//! ```text
//! Δy[t] = α + γ·y[t-1] + Σ_{j=1..p} δ_j·Δy[t-j] + ε[t]
//! ```
//!
//! The statistic is the t-value of γ. The lag order `p` is chosen by
//! minimising AIC over `0..=maxlag` on a common sample, then the model is
//! re-estimated on the largest sample that lag order allows.

use super::error::StatsError;
use super::mackinnon::mackinnon_p_value;
use super::ols;
use nalgebra::{DMatrix, DVector};

/// Deterministic terms included in the test regression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deterministic {
    /// No constant (used on Engle-Granger residuals)
    None,
    /// Constant only
    Constant,
}

impl Deterministic {
    fn terms(self) -> usize {
        match self {
            Deterministic::None => 0,
            Deterministic::Constant => 1,
        }
    }
}

/// Outcome of an ADF test
#[derive(Debug, Clone, PartialEq)]
pub struct AdfResult {
    /// t-statistic of the lagged level coefficient
    pub statistic: f64,
    /// MacKinnon approximate p-value. Only the constant-term table is
    /// available, so this is `None` for [`Deterministic::None`].
    pub p_value: Option<f64>,
    /// Lag order selected by AIC
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    /// Best AIC found during lag selection
    pub aic: f64,
}

/// Schwert's rule capped so the regression keeps enough degrees of freedom.
pub fn max_lag(nobs: usize, deterministic: Deterministic) -> Result<usize, StatsError> {
    let ntrend = deterministic.terms();
    let schwert = (12.0 * (nobs as f64 / 100.0).powf(0.25)).ceil() as i64;
    let cap = (nobs / 2) as i64 - ntrend as i64 - 1;
    let lag = schwert.min(cap);
    if lag < 0 {
        return Err(StatsError::SampleTooShort {
            required: 2 * (ntrend + 1),
            actual: nobs,
        });
    }
    Ok(lag as usize)
}

/// Build `(design, response)` for rows `start..diffs.len()` with `lags`
/// lagged differences. Column order: deterministic terms, level, lags.
fn design_matrix(
    levels: &[f64],
    diffs: &[f64],
    start: usize,
    lags: usize,
    deterministic: Deterministic,
) -> (DMatrix<f64>, DVector<f64>) {
    let ntrend = deterministic.terms();
    let rows = diffs.len() - start;
    let columns = ntrend + 1 + lags;

    let design = DMatrix::from_fn(rows, columns, |r, c| {
        let t = start + r;
        if c < ntrend {
            1.0
        } else if c == ntrend {
            levels[t]
        } else {
            let j = c - ntrend;
            diffs[t - j]
        }
    });
    let response = DVector::from_fn(rows, |r, _| diffs[start + r]);

    (design, response)
}

/// Run the ADF test with AIC lag selection.
pub fn adf_test(series: &[f64], deterministic: Deterministic) -> Result<AdfResult, StatsError> {
    if series.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite("ADF input"));
    }
    if series.len() < 3 {
        return Err(StatsError::SampleTooShort {
            required: 3,
            actual: series.len(),
        });
    }
    if series.windows(2).all(|w| w[0] == w[1]) {
        return Err(StatsError::ConstantSeries);
    }

    let maxlag = max_lag(series.len(), deterministic)?;
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let level_col = deterministic.terms();

    // Lag search on the common sample that the longest lag allows
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=maxlag {
        let (design, response) = design_matrix(series, &diffs, maxlag, lag, deterministic);
        let fit = ols::fit(&design, &response)?;
        let aic = fit.aic();
        let improves = match best {
            Some((best_aic, _)) => aic < best_aic,
            None => true,
        };
        if improves {
            best = Some((aic, lag));
        }
    }
    let (aic, used_lag) = best.ok_or(StatsError::SampleTooShort {
        required: 3,
        actual: series.len(),
    })?;

    let (design, response) = design_matrix(series, &diffs, used_lag, used_lag, deterministic);
    let fit = ols::fit(&design, &response)?;
    let statistic = fit.t_value(level_col);
    if statistic.is_nan() {
        return Err(StatsError::NonFinite("ADF statistic"));
    }

    let p_value = match deterministic {
        Deterministic::Constant => Some(mackinnon_p_value(statistic, 1)?),
        Deterministic::None => None,
    };

    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        nobs: fit.nobs,
        aic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::testing::noise;

    #[test]
    fn test_max_lag_schwert_rule() {
        // ceil(12 * (100/100)^0.25) = 12
        assert_eq!(max_lag(100, Deterministic::Constant).unwrap(), 12);
        // Capped by nobs / 2 - 2
        assert_eq!(max_lag(20, Deterministic::Constant).unwrap(), 8);
        assert_eq!(max_lag(20, Deterministic::None).unwrap(), 9);
        assert!(max_lag(2, Deterministic::Constant).is_err());
    }

    #[test]
    fn test_stationary_series_rejects_unit_root() {
        let eps = noise(250, 7);
        let mut series = Vec::with_capacity(eps.len());
        let mut current = 0.0;
        for e in eps {
            current = 0.3 * current + e;
            series.push(current);
        }

        let result = adf_test(&series, Deterministic::Constant).unwrap();
        assert!(result.statistic < -3.0, "stat = {}", result.statistic);
        let p = result.p_value.unwrap();
        assert!(p < 0.01, "p = {}", p);
    }

    #[test]
    fn test_trending_series_keeps_unit_root() {
        // Constant-only regression cannot explain a linear trend
        let series: Vec<f64> = noise(250, 11)
            .into_iter()
            .enumerate()
            .map(|(i, e)| 100.0 + 0.5 * i as f64 + e)
            .collect();

        let result = adf_test(&series, Deterministic::Constant).unwrap();
        let p = result.p_value.unwrap();
        assert!(p > 0.10, "p = {}", p);
    }

    #[test]
    fn test_constant_series_is_an_error() {
        let series = vec![5.0; 50];
        assert_eq!(
            adf_test(&series, Deterministic::Constant),
            Err(StatsError::ConstantSeries)
        );
    }

    #[test]
    fn test_short_series_is_an_error() {
        assert!(adf_test(&[1.0, 2.0], Deterministic::Constant).is_err());
    }

    #[test]
    fn test_used_lag_within_bounds() {
        let eps = noise(120, 3);
        let result = adf_test(&eps, Deterministic::None).unwrap();
        assert!(result.used_lag <= max_lag(120, Deterministic::None).unwrap());
        assert_eq!(result.nobs, 120 - 1 - result.used_lag);
    }

    #[test]
    fn test_p_value_only_for_constant_regression() {
        let eps = noise(150, 5);
        assert!(adf_test(&eps, Deterministic::None).unwrap().p_value.is_none());
        let p = adf_test(&eps, Deterministic::Constant).unwrap().p_value.unwrap();
        assert!((0.0..=1.0).contains(&p));
    }
}
