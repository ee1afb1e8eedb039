use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;

use pairscout::cli::{parse_symbols, Cli, Commands, DataCliConfig, DiscoveryOverrides};
use pairscout::commands::{run_discover_pairs, run_fetch, run_spread};
use pairscout::data::PriceField;
use pairscout::discovery::DiscoveryConfig;
use pairscout::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from the .env file
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.verbose)?;

    let default_lookback = DiscoveryConfig::default().lookback_days;

    match cli.command {
        Commands::Fetch {
            data,
            symbols,
            output,
        } => {
            let data = DataCliConfig::from_args(&data, default_lookback, Utc::now())?;
            let symbols = parse_symbols(&symbols)?;
            run_fetch(&data, &symbols, &output).await?;
        }
        Commands::DiscoverPairs {
            data,
            symbols,
            config,
            coint_pvalue,
            adf_pvalue,
            min_observations,
            price_field,
            workers,
            progress_interval,
            output,
            show_rejected,
        } => {
            let explicit_symbols = symbols.is_some() || config.is_some();
            let base = match &config {
                Some(path) => DiscoveryConfig::from_file(Path::new(path))?,
                None => DiscoveryConfig::default(),
            };
            let config = DiscoveryOverrides {
                symbols,
                coint_pvalue,
                adf_pvalue,
                min_observations,
                price_field,
                workers,
                progress_interval,
                lookback_days: data.lookback_days,
            }
            .apply(base)?;

            let data = DataCliConfig::from_args(&data, config.lookback_days, Utc::now())?;
            run_discover_pairs(&data, config, explicit_symbols, &output, show_rejected).await?;
        }
        Commands::Spread {
            data,
            symbol1,
            symbol2,
            hedge_ratio,
            price_field,
            output,
        } => {
            let data = DataCliConfig::from_args(&data, default_lookback, Utc::now())?;
            let price_field: PriceField = price_field.parse()?;
            run_spread(
                &data,
                &symbol1,
                &symbol2,
                hedge_ratio,
                price_field,
                output.as_deref(),
            )
            .await?;
        }
    }

    Ok(())
}
