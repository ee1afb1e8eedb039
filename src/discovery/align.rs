//! Alignment of two price series on their shared timestamps

use crate::data::PriceSeries;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Two equal-length price sequences on a common timestamp index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPair {
    pub timestamps: Vec<DateTime<Utc>>,
    /// Prices of the first series (regression target `y`)
    pub first: Vec<f64>,
    /// Prices of the second series (regressor `x`)
    pub second: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Residual spread `first - hedge_ratio * second`
    pub fn spread(&self, hedge_ratio: f64) -> Vec<f64> {
        self.first
            .iter()
            .zip(&self.second)
            .map(|(y, x)| y - hedge_ratio * x)
            .collect()
    }
}

/// Intersect two series on shared timestamps, keeping chronological order.
///
/// Timestamps present in only one series are dropped. Never fails; a short
/// or empty result is for the caller to judge.
pub fn align(series1: &PriceSeries, series2: &PriceSeries) -> AlignedPair {
    let a = series1.points();
    let b = series2.points();
    let capacity = a.len().min(b.len());

    let mut aligned = AlignedPair {
        timestamps: Vec::with_capacity(capacity),
        first: Vec::with_capacity(capacity),
        second: Vec::with_capacity(capacity),
    };

    // Both inputs are strictly increasing, so a linear merge suffices
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].timestamp.cmp(&b[j].timestamp) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                aligned.timestamps.push(a[i].timestamp);
                aligned.first.push(a[i].price);
                aligned.second.push(b[j].price);
                i += 1;
                j += 1;
            }
        }
    }

    aligned
}
