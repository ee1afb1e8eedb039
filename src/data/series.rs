//! Typed price series and OHLCV bars

use super::error::DataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One observation of a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// An ordered, timestamp-indexed price series for one symbol.
///
/// Timestamps are strictly increasing; construction rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, validating timestamp order.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, DataError> {
        let symbol = symbol.into();
        if let Some(pos) = points.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(DataError::InvalidSeries {
                symbol,
                reason: format!(
                    "timestamp {} does not follow {}",
                    points[pos + 1].timestamp,
                    points[pos].timestamp
                ),
            });
        }
        Ok(Self { symbol, points })
    }

    /// Build a series from `(timestamp, price)` tuples.
    pub fn from_pairs(
        symbol: impl Into<String>,
        pairs: impl IntoIterator<Item = (DateTime<Utc>, f64)>,
    ) -> Result<Self, DataError> {
        let points = pairs
            .into_iter()
            .map(|(timestamp, price)| PricePoint { timestamp, price })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Prices in chronological order
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Which column of a bar to read as the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    AdjClose,
    Volume,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::AdjClose => "adj_close",
            PriceField::Volume => "volume",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PriceField {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            "adj_close" | "adjclose" => Ok(Self::AdjClose),
            "volume" => Ok(Self::Volume),
            _ => Err(DataError::UnknownField(s.to_string())),
        }
    }
}

/// Daily (or intraday) OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<f64>,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Value of `field`; `AdjClose` falls back to `close` when absent.
    pub fn value(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjClose => self.adj_close.unwrap_or(self.close),
            PriceField::Volume => self.volume,
        }
    }

    /// True when every populated field is a finite number
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
            && self.adj_close.map_or(true, f64::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = PriceSeries::from_pairs("AAPL", vec![(ts(1), 1.0), (ts(1), 2.0)]);
        assert!(matches!(result, Err(DataError::InvalidSeries { .. })));
    }

    #[test]
    fn test_series_rejects_decreasing_timestamps() {
        let result = PriceSeries::from_pairs("AAPL", vec![(ts(2), 1.0), (ts(1), 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_accessors() {
        let series = PriceSeries::from_pairs("MSFT", vec![(ts(1), 10.0), (ts(3), 11.0)]).unwrap();
        assert_eq!(series.symbol(), "MSFT");
        assert_eq!(series.len(), 2);
        assert_eq!(series.prices(), vec![10.0, 11.0]);
        assert_eq!(series.last().map(|p| p.timestamp), Some(ts(3)));
    }

    #[test]
    fn test_price_field_parsing() {
        assert_eq!("Close".parse::<PriceField>().unwrap(), PriceField::Close);
        assert_eq!("adj-close".parse::<PriceField>().unwrap(), PriceField::AdjClose);
        assert!("vwap".parse::<PriceField>().is_err());
    }

    #[test]
    fn test_adj_close_falls_back_to_close() {
        let bar = Bar {
            timestamp: ts(1),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            adj_close: None,
            volume: 100.0,
        };
        assert_eq!(bar.value(PriceField::AdjClose), 1.5);
        assert!(bar.is_complete());
    }
}
