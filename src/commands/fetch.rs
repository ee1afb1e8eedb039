//! Market data fetch command handler.
//!
//! Implements the `fetch` subcommand and the data loading shared by every
//! other subcommand.

use crate::cli::{DataCliConfig, DataSourceKind};
use crate::data::{DataManager, JsonFileSource, MarketDataProvider, SyntheticSource};

use std::path::Path;
use tracing::{info, warn};

/// Number of common factors behind synthetic prices
const SYNTHETIC_FACTORS: usize = 3;

/// Build a data manager holding bars for `symbols`.
///
/// A snapshot is loaded as-is; the other sources are fetched over the
/// configured window. Symbols that cannot be fetched are simply absent.
pub async fn load_market_data(
    data: &DataCliConfig,
    symbols: &[String],
) -> Result<DataManager, Box<dyn std::error::Error>> {
    let manager = match &data.source {
        DataSourceKind::Snapshot(path) => DataManager::load(path)?,
        DataSourceKind::JsonDir(dir) => {
            let mut manager = DataManager::new(data.start, data.end);
            manager.fetch(&JsonFileSource::new(dir.clone()), symbols).await;
            manager
        }
        DataSourceKind::Synthetic { seed } => {
            let mut manager = DataManager::new(data.start, data.end);
            manager
                .fetch(&SyntheticSource::new(*seed, SYNTHETIC_FACTORS), symbols)
                .await;
            manager
        }
    };

    let available = manager.available_symbols();
    let missing: Vec<&str> = symbols
        .iter()
        .filter(|s| !available.contains(s))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Some symbols have no data");
    }

    Ok(manager)
}

/// Fetch bars for `symbols` and save them as a snapshot at `output_path`.
pub async fn run_fetch(
    data: &DataCliConfig,
    symbols: &[String],
    output_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- PairScout: Fetching Market Data ---");

    let manager = load_market_data(data, symbols).await?;
    let summaries = manager.summaries();

    if summaries.is_empty() {
        warn!("No data fetched, nothing to save");
        return Ok(());
    }

    println!(
        "\n{:<10} | {:>7} | {:>10} | {:>10} | {:>10}",
        "Symbol", "Records", "Start", "End", "Last Close"
    );
    println!("{}", "-".repeat(59));
    for summary in &summaries {
        println!(
            "{:<10} | {:>7} | {:>10} | {:>10} | {:>10.2}",
            summary.symbol,
            summary.records,
            summary.start.format("%Y-%m-%d"),
            summary.end.format("%Y-%m-%d"),
            summary.last_close
        );
    }

    manager.save(Path::new(output_path))?;
    println!("\n✓ Saved {} symbols to {}", summaries.len(), output_path);
    println!(
        "  Run with: pairscout discover-pairs --snapshot {}",
        output_path
    );

    Ok(())
}
