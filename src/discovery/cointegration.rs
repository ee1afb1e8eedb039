//! Engle-Granger cointegration screen for a single pair
//!
//! Produces the triple `(cointegration_pvalue, hedge_ratio, adf_pvalue)`:
//! the Engle-Granger p-value of `y` on `x`, the no-intercept OLS hedge
//! ratio, and the ADF p-value of the hedged spread `y - hedge_ratio * x`.

use super::align::{align, AlignedPair};
use super::error::DiscoveryError;
use crate::data::PriceSeries;
use crate::math::{adf_test, engle_granger, slope_through_origin, Deterministic, StatsError};
use tracing::trace;

/// Result of testing one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CointegrationResult {
    pub cointegration_pvalue: f64,
    pub hedge_ratio: f64,
    pub adf_pvalue: f64,
    /// Aligned observations the test ran on
    pub observations: usize,
}

impl CointegrationResult {
    /// Sentinel returned when there is too little aligned data: fails any
    /// threshold, signals "insufficient evidence" rather than an error.
    pub fn insufficient(observations: usize) -> Self {
        Self {
            cointegration_pvalue: 1.0,
            hedge_ratio: 0.0,
            adf_pvalue: 1.0,
            observations,
        }
    }

    /// `(cointegration_pvalue, hedge_ratio, adf_pvalue)`
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.cointegration_pvalue, self.hedge_ratio, self.adf_pvalue)
    }
}

/// Runs the two-stage cointegration / stationarity test
#[derive(Debug, Clone, Copy)]
pub struct CointegrationTester {
    min_observations: usize,
}

impl CointegrationTester {
    pub fn new(min_observations: usize) -> Self {
        Self { min_observations }
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    /// Align the two series and test them.
    pub fn test(
        &self,
        series1: &PriceSeries,
        series2: &PriceSeries,
    ) -> Result<CointegrationResult, DiscoveryError> {
        self.test_aligned(&align(series1, series2))
    }

    /// Test an already aligned pair.
    ///
    /// # Errors
    /// `DiscoveryError::Statistical` on numerical failure (singular
    /// regression, constant input, sample too short for the ADF lags).
    pub fn test_aligned(&self, aligned: &AlignedPair) -> Result<CointegrationResult, DiscoveryError> {
        let observations = aligned.len();
        if observations < self.min_observations {
            return Ok(CointegrationResult::insufficient(observations));
        }

        let y = &aligned.first;
        let x = &aligned.second;

        let eg = engle_granger(y, x)?;
        let hedge_ratio = slope_through_origin(y, x)?;
        let spread = aligned.spread(hedge_ratio);

        let adf_pvalue = match adf_test(&spread, Deterministic::Constant) {
            Ok(adf) => adf.p_value.ok_or(StatsError::UnsupportedTable { n_vars: 1 })?,
            Err(StatsError::ConstantSeries) => {
                // A spread with no variation is as stationary as it gets
                trace!(hedge_ratio, "Spread is constant");
                0.0
            }
            Err(e) => return Err(e.into()),
        };

        Ok(CointegrationResult {
            cointegration_pvalue: eg.p_value,
            hedge_ratio,
            adf_pvalue,
            observations,
        })
    }
}
