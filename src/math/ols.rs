//! Ordinary least squares
//!
//! QR-based OLS with classical (homoskedastic) standard errors and the
//! Gaussian log-likelihood needed for information-criterion lag selection.

use super::error::StatsError;
use nalgebra::{DMatrix, DVector};

/// Result of an OLS fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column
    pub params: Vec<f64>,
    /// Standard errors of `params`
    pub std_errors: Vec<f64>,
    /// In-sample residuals
    pub residuals: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Total sum of squares around the mean of the response
    pub centered_tss: f64,
    /// Number of observations
    pub nobs: usize,
}

impl OlsFit {
    /// Number of estimated parameters
    pub fn k(&self) -> usize {
        self.params.len()
    }

    /// t-statistic of coefficient `idx`
    pub fn t_value(&self, idx: usize) -> f64 {
        self.params[idx] / self.std_errors[idx]
    }

    /// Gaussian log-likelihood at the OLS estimate
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion: `-2 llf + 2 k`
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k() as f64
    }

    /// Coefficient of determination relative to the response mean.
    ///
    /// Only meaningful when the design contains a constant column.
    pub fn r_squared(&self) -> f64 {
        1.0 - self.ssr / self.centered_tss
    }
}

/// Fit `response = design * beta + e` by least squares.
pub fn fit(design: &DMatrix<f64>, response: &DVector<f64>) -> Result<OlsFit, StatsError> {
    let (rows, columns) = design.shape();
    if response.len() != rows {
        return Err(StatsError::LengthMismatch {
            left: rows,
            right: response.len(),
        });
    }
    if columns == 0 {
        return Err(StatsError::SingularDesign { rows, columns });
    }
    if rows <= columns {
        return Err(StatsError::SampleTooShort {
            required: columns + 1,
            actual: rows,
        });
    }
    if !design.iter().all(|v| v.is_finite()) || !response.iter().all(|v| v.is_finite()) {
        return Err(StatsError::NonFinite("regression input"));
    }

    let qr = design.clone().qr();
    let r = qr.r();

    // Rank check on the triangular factor
    let max_diag = r.diagonal().iter().fold(0.0f64, |acc, d| acc.max(d.abs()));
    let tolerance = max_diag * rows as f64 * f64::EPSILON;
    if max_diag == 0.0 || r.diagonal().iter().any(|d| d.abs() <= tolerance) {
        return Err(StatsError::SingularDesign { rows, columns });
    }

    let qty = qr.q().transpose() * response;
    let beta = r
        .solve_upper_triangular(&qty)
        .ok_or(StatsError::SingularDesign { rows, columns })?;

    let residuals = response - design * &beta;
    let ssr = residuals.norm_squared();

    let mean = response.mean();
    let centered_tss = response.iter().map(|v| (v - mean).powi(2)).sum::<f64>();

    let r_inv = r
        .try_inverse()
        .ok_or(StatsError::SingularDesign { rows, columns })?;
    let cov_unscaled = &r_inv * r_inv.transpose();
    let sigma2 = ssr / (rows - columns) as f64;

    let std_errors = (0..columns)
        .map(|j| (sigma2 * cov_unscaled[(j, j)]).sqrt())
        .collect();

    Ok(OlsFit {
        params: beta.iter().copied().collect(),
        std_errors,
        residuals: residuals.iter().copied().collect(),
        ssr,
        centered_tss,
        nobs: rows,
    })
}

/// Slope of `y` on `x` with no intercept: `Σxy / Σx²`.
pub fn slope_through_origin(y: &[f64], x: &[f64]) -> Result<f64, StatsError> {
    if y.len() != x.len() {
        return Err(StatsError::LengthMismatch {
            left: y.len(),
            right: x.len(),
        });
    }
    if x.is_empty() {
        return Err(StatsError::SampleTooShort {
            required: 1,
            actual: 0,
        });
    }

    let (sxy, sxx) = y
        .iter()
        .zip(x)
        .fold((0.0, 0.0), |(sxy, sxx), (yi, xi)| (sxy + yi * xi, sxx + xi * xi));

    if !sxy.is_finite() || !sxx.is_finite() {
        return Err(StatsError::NonFinite("hedge regression"));
    }
    if sxx == 0.0 {
        return Err(StatsError::SingularDesign {
            rows: x.len(),
            columns: 1,
        });
    }

    Ok(sxy / sxx)
}
