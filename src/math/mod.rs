//! Statistical kernel for pair discovery.
//!
//! This module provides the numerical routines behind the cointegration
//! screen: least squares, the augmented Dickey-Fuller test with AIC lag
//! selection, the Engle-Granger test and MacKinnon p-values.

pub mod adf;
pub mod engle_granger;
pub mod error;
pub mod mackinnon;
pub mod ols;
#[cfg(test)]
pub(crate) mod testing;

pub use adf::{adf_test, AdfResult, Deterministic};
pub use engle_granger::{engle_granger, EngleGrangerResult};
pub use error::StatsError;
pub use mackinnon::mackinnon_p_value;
pub use ols::{slope_through_origin, OlsFit};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); zero for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
