//! CLI argument parsing using clap.
//!
//! This module defines the command-line interface for PairScout,
//! including all subcommands and their arguments.

mod config;

pub use config::{parse_date, parse_symbols, CliConfigError, DataCliConfig, DataSourceKind, DiscoveryOverrides};

use clap::{Args, Parser, Subcommand};

/// PairScout - Cointegrated Pair Screener
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,
}

/// Where market data comes from (shared by all subcommands)
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory of per-symbol JSON bar files (<dir>/<SYMBOL>.json)
    #[arg(long, conflicts_with_all = ["synthetic", "snapshot"])]
    pub data_dir: Option<String>,
    /// Generate deterministic synthetic data (no files required)
    #[arg(long, default_value_t = false)]
    pub synthetic: bool,
    /// Load a snapshot previously written by `fetch`
    #[arg(long, conflicts_with = "synthetic")]
    pub snapshot: Option<String>,
    /// Seed for synthetic data
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Historical lookback period in days, ignored with --start (default 1460)
    #[arg(long)]
    pub lookback_days: Option<u32>,
    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Day after the last day of the window (YYYY-MM-DD, default today)
    #[arg(long)]
    pub end: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch market data for a universe and save it as a snapshot
    Fetch {
        #[command(flatten)]
        data: DataArgs,
        /// Symbols (comma-separated) or a universe: default, tech, financial, healthcare, energy
        #[arg(long, default_value = "default")]
        symbols: String,
        /// Snapshot output path
        #[arg(long, default_value = "market_data.json")]
        output: String,
    },

    /// Screen every pair of a universe for cointegration
    DiscoverPairs {
        #[command(flatten)]
        data: DataArgs,
        /// Symbols (comma-separated) or a universe: default, tech, financial, healthcare, energy
        #[arg(long)]
        symbols: Option<String>,
        /// JSON discovery config; flags below override its fields
        #[arg(long)]
        config: Option<String>,
        /// Maximum Engle-Granger p-value
        #[arg(long)]
        coint_pvalue: Option<f64>,
        /// Maximum ADF p-value of the hedged spread
        #[arg(long)]
        adf_pvalue: Option<f64>,
        /// Minimum number of aligned observations
        #[arg(long)]
        min_observations: Option<usize>,
        /// Price field: open, high, low, close, adj_close, volume
        #[arg(long)]
        price_field: Option<String>,
        /// Worker threads (1 = sequential)
        #[arg(long)]
        workers: Option<usize>,
        /// Report progress every N pairs
        #[arg(long)]
        progress_interval: Option<usize>,
        /// Output file path for the JSON report
        #[arg(long, default_value = "discovered_pairs.json")]
        output: String,
        /// Also print rejected and failed pairs
        #[arg(long, default_value_t = false)]
        show_rejected: bool,
    },

    /// Compute the hedged spread of one pair
    Spread {
        #[command(flatten)]
        data: DataArgs,
        /// Regression target
        #[arg(long)]
        symbol1: String,
        /// Regressor
        #[arg(long)]
        symbol2: String,
        /// Hedge ratio; estimated from the data when omitted
        #[arg(long)]
        hedge_ratio: Option<f64>,
        /// Price field: open, high, low, close, adj_close, volume
        #[arg(long, default_value = "close")]
        price_field: String,
        /// Write the spread series as JSON to this path
        #[arg(long)]
        output: Option<String>,
    },
}
