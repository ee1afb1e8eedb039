//! Spread command handler.
//!
//! Implements the `spread` subcommand: the hedged spread series of one pair
//! together with its mean, standard deviation and latest z-score.

use super::fetch::load_market_data;
use crate::cli::DataCliConfig;
use crate::data::{MarketDataProvider, PriceField};
use crate::discovery::{
    spread_series, CointegrationTester, DiscoveryError, SpreadStatistics, ThresholdConfig,
};

use tracing::info;

/// Compute and print the spread of `symbol1 - hedge_ratio * symbol2`.
///
/// Without an explicit `hedge_ratio` it is estimated by the same test the
/// discovery scan runs.
///
/// # Errors
/// Returns error if either symbol has no data, there are too few aligned
/// observations to estimate the hedge ratio, or the output cannot be written.
pub async fn run_spread(
    data: &DataCliConfig,
    symbol1: &str,
    symbol2: &str,
    hedge_ratio: Option<f64>,
    price_field: PriceField,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- PairScout: Spread Analysis ---");

    let symbols = [symbol1.to_string(), symbol2.to_string()];
    let manager = load_market_data(data, &symbols).await?;
    let series1 = manager.get_price_series(symbol1, price_field)?;
    let series2 = manager.get_price_series(symbol2, price_field)?;

    let hedge_ratio = match hedge_ratio {
        Some(h) => h,
        None => {
            let tester = CointegrationTester::new(ThresholdConfig::default().min_observations);
            let result = tester.test(&series1, &series2)?;
            if result.observations < tester.min_observations() {
                return Err(DiscoveryError::InsufficientData {
                    expected: tester.min_observations(),
                    actual: result.observations,
                }
                .into());
            }
            info!(
                hedge_ratio = format!("{:.4}", result.hedge_ratio),
                coint_p = format!("{:.4}", result.cointegration_pvalue),
                adf_p = format!("{:.4}", result.adf_pvalue),
                "Estimated hedge ratio"
            );
            result.hedge_ratio
        }
    };

    let spread = spread_series(&series1, &series2, hedge_ratio)?;
    let stats = SpreadStatistics::from_spread(&spread.prices())?;

    println!("\n=== {} ===", spread.symbol());
    println!("Hedge ratio:   {:.4}", hedge_ratio);
    println!("Observations:  {}", spread.len());
    println!("Spread mean:   {:.4}", stats.mean);
    println!("Spread std:    {:.4}", stats.std);
    if let Some(last) = spread.last() {
        match stats.z_score(last.price) {
            Some(z) => println!(
                "Latest:        {:.4} on {} (z = {:+.2})",
                last.price,
                last.timestamp.format("%Y-%m-%d"),
                z
            ),
            None => println!("Latest:        {:.4} (z undefined)", last.price),
        }
    }

    if let Some(path) = output_path {
        let json = serde_json::to_string_pretty(&spread)?;
        std::fs::write(path, &json)?;
        info!(output = path, points = spread.len(), "Spread saved");
        println!("\n✓ Saved spread series to {}", path);
    }

    Ok(())
}
