//! Market data layer
//!
//! Typed price series, bar sources and the caching [`DataManager`] that
//! plays the data-provider role for pair discovery.

pub mod error;
pub mod manager;
pub mod provider;
pub mod series;
pub mod source;
pub mod synthetic;

pub use error::DataError;
pub use manager::{DataManager, DataSummary};
pub use provider::MarketDataProvider;
pub use series::{Bar, PriceField, PricePoint, PriceSeries};
pub use source::{BarSource, JsonFileSource};
pub use synthetic::SyntheticSource;
