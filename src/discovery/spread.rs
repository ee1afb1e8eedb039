//! Spread statistics
//!
//! The spread is `price1 - hedge_ratio * price2` on the aligned timestamps.
//! Alignment is the same pure function the tester uses, so statistics for a
//! given hedge ratio always describe the residual the ADF test saw.

use super::align::{align, AlignedPair};
use super::error::DiscoveryError;
use crate::data::{PricePoint, PriceSeries};
use crate::math::{mean, sample_std};
use serde::Serialize;

/// Mean and sample standard deviation of a spread
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadStatistics {
    pub mean: f64,
    pub std: f64,
}

impl SpreadStatistics {
    /// Re-align both series and summarise their spread.
    pub fn compute(
        series1: &PriceSeries,
        series2: &PriceSeries,
        hedge_ratio: f64,
    ) -> Result<Self, DiscoveryError> {
        Self::from_aligned(&align(series1, series2), hedge_ratio)
    }

    /// Summarise the spread of an already aligned pair.
    pub fn from_aligned(aligned: &AlignedPair, hedge_ratio: f64) -> Result<Self, DiscoveryError> {
        Self::from_spread(&aligned.spread(hedge_ratio))
    }

    /// Summarise a spread series.
    ///
    /// # Errors
    /// `DiscoveryError::InsufficientData` for an empty spread.
    pub fn from_spread(spread: &[f64]) -> Result<Self, DiscoveryError> {
        let mean = mean(spread).ok_or(DiscoveryError::InsufficientData {
            expected: 1,
            actual: 0,
        })?;
        Ok(Self {
            mean,
            std: sample_std(spread),
        })
    }

    /// `(mean, std)`
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.mean, self.std)
    }

    /// How many standard deviations `value` sits from the mean
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.std == 0.0 || !self.std.is_finite() {
            return None;
        }
        Some((value - self.mean) / self.std)
    }
}

/// Full spread series of a pair, named `Spread_<symbol1>_<symbol2>`.
pub fn spread_series(
    series1: &PriceSeries,
    series2: &PriceSeries,
    hedge_ratio: f64,
) -> Result<PriceSeries, DiscoveryError> {
    let aligned = align(series1, series2);
    let points = aligned
        .timestamps
        .iter()
        .zip(aligned.spread(hedge_ratio))
        .map(|(timestamp, price)| PricePoint {
            timestamp: *timestamp,
            price,
        })
        .collect();

    let name = format!("Spread_{}_{}", series1.symbol(), series2.symbol());
    Ok(PriceSeries::new(name, points)?)
}
