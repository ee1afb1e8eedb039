//! CLI command handlers.
//!
//! This module contains the implementation for each CLI subcommand,
//! delegating to the data layer and the discovery pipeline.

mod discover;
mod fetch;
mod spread;

pub use discover::run_discover_pairs;
pub use fetch::{load_market_data, run_fetch};
pub use spread::run_spread;
