//! Deterministic synthetic bars for demos and CI.
//!
//! Every symbol loads on one of `factor_count` shared random-walk factors
//! plus its own mean-reverting noise, so symbols that share a factor are
//! cointegrated and symbols on different factors are not. Prices are
//! proportional to the factor, so the through-origin hedge ratio recovers
//! the loading ratio. A few days are
//! dropped per symbol so alignment has real work to do.

use super::error::DataError;
use super::series::Bar;
use super::source::BarSource;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

/// Persistence of the idiosyncratic AR(1) component
const IDIOSYNCRATIC_PHI: f64 = 0.5;

/// One day in every `GAP_PERIOD` is missing for each symbol
const GAP_PERIOD: u64 = 37;

/// Minimal 64-bit LCG; quality is irrelevant for synthetic data
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0x9e37_79b9_7f4a_7c15)
    }

    /// Uniform in [-0.5, 0.5)
    fn next_centered(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f64) / ((1u64 << 31) as f64) - 0.5
    }
}

fn symbol_hash(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3))
}

/// Synthetic daily bar generator
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
    factor_count: usize,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(42, 3)
    }
}

impl SyntheticSource {
    pub fn new(seed: u64, factor_count: usize) -> Self {
        Self {
            seed,
            factor_count: factor_count.max(1),
        }
    }

    /// Index of the factor `symbol` loads on
    pub fn factor_of(&self, symbol: &str) -> usize {
        (symbol_hash(symbol) % self.factor_count as u64) as usize
    }

    fn days(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let first = Utc.from_utc_datetime(&start.date_naive().and_time(NaiveTime::MIN));
        let first = if first < start { first + Duration::days(1) } else { first };

        let mut days = Vec::new();
        let mut day = first;
        while day < end {
            days.push(day);
            day += Duration::days(1);
        }
        days
    }

    fn generate(&self, symbol: &str, days: &[DateTime<Utc>]) -> Vec<Bar> {
        let hash = symbol_hash(symbol);
        let factor = self.factor_of(symbol);

        let mut factor_rng = Lcg::new(self.seed.wrapping_add(factor as u64 * 7919));
        let mut own_rng = Lcg::new(self.seed ^ hash);

        let loading = 0.5 + (hash >> 8) as f64 % 150.0 / 100.0;

        let mut factor_level = 100.0;
        let mut idiosyncratic = 0.0;
        let mut bars = Vec::with_capacity(days.len());

        for (i, &timestamp) in days.iter().enumerate() {
            factor_level += 2.0 * factor_rng.next_centered();
            idiosyncratic = IDIOSYNCRATIC_PHI * idiosyncratic + own_rng.next_centered();

            if (hash.wrapping_add(i as u64)) % GAP_PERIOD == 0 {
                continue;
            }

            let close = (loading * factor_level + idiosyncratic).max(1.0);
            let range = 0.01 * close;
            bars.push(Bar {
                timestamp,
                open: close - 0.5 * range,
                high: close + range,
                low: close - range,
                close,
                adj_close: None,
                volume: 1_000_000.0 * (1.0 + own_rng.next_centered()),
            });
        }
        bars
    }
}

#[async_trait]
impl BarSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, DataError> {
        if symbol.trim().is_empty() {
            return Err(DataError::Fetch {
                symbol: symbol.to_string(),
                reason: "empty symbol".to_string(),
            });
        }
        Ok(self.generate(symbol, &Self::days(start, end)))
    }
}
