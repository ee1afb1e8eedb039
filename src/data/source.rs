//! Bar sources feeding the data manager

use super::error::DataError;
use super::series::Bar;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::debug;

/// Asynchronous supplier of historical bars
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Bars for `symbol` with `start <= timestamp < end`, oldest first.
    async fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, DataError>;
}

/// Reads `<dir>/<SYMBOL>.json`, each file a JSON array of bars.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol))
    }
}

#[async_trait]
impl BarSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-files"
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        debug!(symbol = %symbol, path = %path.display(), "Reading bar file");

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DataError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;

        let bars: Vec<Bar> = serde_json::from_str(&raw)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp < end)
            .collect())
    }
}
