//! Market data manager
//!
//! Fetches bars from a [`BarSource`], cleans them, caches them per symbol
//! and serves price series to the pair enumerator.

use super::error::DataError;
use super::provider::MarketDataProvider;
use super::series::{Bar, PriceField, PricePoint, PriceSeries};
use super::source::BarSource;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Per-symbol overview of cached data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub symbol: String,
    pub records: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub last_close: f64,
}

/// On-disk snapshot format
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bars: BTreeMap<String, Vec<Bar>>,
}

/// Caching market data collaborator
#[derive(Debug, Clone)]
pub struct DataManager {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bars: BTreeMap<String, Vec<Bar>>,
    request_delay: Option<Duration>,
}

impl DataManager {
    /// Empty manager covering `[start, end)`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            bars: BTreeMap::new(),
            request_delay: None,
        }
    }

    /// Pause between symbol requests (rate-limited sources)
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = Some(delay);
        self
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Fetch and cache bars for `symbols`.
    ///
    /// Symbols that fail or come back empty are logged and left out; a
    /// partial fetch is not an error. Returns the close series of every
    /// symbol fetched by this call.
    pub async fn fetch(
        &mut self,
        source: &dyn BarSource,
        symbols: &[String],
    ) -> BTreeMap<String, PriceSeries> {
        info!(
            source = source.name(),
            symbols = symbols.len(),
            start = %self.start.format("%Y-%m-%d"),
            end = %self.end.format("%Y-%m-%d"),
            "Fetching market data"
        );

        let mut fetched = BTreeMap::new();

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                if let Some(delay) = self.request_delay {
                    sleep(delay).await;
                }
            }

            match source.fetch_bars(symbol, self.start, self.end).await {
                Ok(bars) => {
                    let records = self.insert_bars(symbol, bars);
                    if records == 0 {
                        warn!(symbol = %symbol, "No data available");
                        continue;
                    }
                    info!(symbol = %symbol, records, "Fetched");
                    if let Ok(series) = self.get_price_series(symbol, PriceField::Close) {
                        fetched.insert(symbol.clone(), series);
                    }
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Error fetching data, skipping");
                }
            }
        }

        info!(
            requested = symbols.len(),
            fetched = fetched.len(),
            "Fetch complete"
        );
        fetched
    }

    /// Clean and cache bars for `symbol`, replacing anything cached before.
    ///
    /// Incomplete bars are dropped, the rest sorted by timestamp with the
    /// last bar winning on duplicates. Returns the number of bars kept; an
    /// empty result removes the symbol.
    pub fn insert_bars(&mut self, symbol: &str, bars: Vec<Bar>) -> usize {
        let total = bars.len();
        let mut cleaned: Vec<Bar> = bars.into_iter().filter(Bar::is_complete).collect();
        cleaned.sort_by_key(|b| b.timestamp);

        let mut deduped: Vec<Bar> = Vec::with_capacity(cleaned.len());
        for bar in cleaned {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        if deduped.len() < total {
            debug!(
                symbol = %symbol,
                dropped = total - deduped.len(),
                "Dropped incomplete or duplicate bars"
            );
        }

        let kept = deduped.len();
        if kept == 0 {
            self.bars.remove(symbol);
        } else {
            self.bars.insert(symbol.to_string(), deduped);
        }
        kept
    }

    /// Cached bars for `symbol`
    pub fn bars(&self, symbol: &str) -> Option<&[Bar]> {
        self.bars.get(symbol).map(Vec::as_slice)
    }

    /// Per-symbol record counts, date range and last close
    pub fn summaries(&self) -> Vec<DataSummary> {
        self.bars
            .iter()
            .filter_map(|(symbol, bars)| {
                let first = bars.first()?;
                let last = bars.last()?;
                Some(DataSummary {
                    symbol: symbol.clone(),
                    records: bars.len(),
                    start: first.timestamp,
                    end: last.timestamp,
                    last_close: last.close,
                })
            })
            .collect()
    }

    /// Write the cache to `path` as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        if self.bars.is_empty() {
            warn!("No data to save");
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let snapshot = Snapshot {
            start: self.start,
            end: self.end,
            bars: self.bars.clone(),
        };
        let json = serde_json::to_string(&snapshot)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        info!(path = %path.display(), symbols = self.bars.len(), "Data saved");
        Ok(())
    }

    /// Load a snapshot written by [`DataManager::save`].
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        let mut manager = Self::new(snapshot.start, snapshot.end);
        for (symbol, bars) in snapshot.bars {
            manager.insert_bars(&symbol, bars);
        }

        info!(path = %path.display(), symbols = manager.bars.len(), "Data loaded");
        Ok(manager)
    }
}

impl MarketDataProvider for DataManager {
    fn get_price_series(&self, symbol: &str, field: PriceField) -> Result<PriceSeries, DataError> {
        let bars = self
            .bars
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

        let points = bars
            .iter()
            .map(|b| PricePoint {
                timestamp: b.timestamp,
                price: b.value(field),
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    fn available_symbols(&self) -> Vec<String> {
        self.bars.keys().cloned().collect()
    }
}
