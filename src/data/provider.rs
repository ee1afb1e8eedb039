//! Read-side contract consumed by the pair enumerator

use super::error::DataError;
use super::series::{PriceField, PriceSeries};

/// Supplies price series for already-fetched symbols.
///
/// Implementations are shared read-only across scan workers, hence the
/// `Send + Sync` bound.
pub trait MarketDataProvider: Send + Sync {
    /// Price series of `symbol` for `field`.
    ///
    /// # Errors
    /// `DataError::SymbolNotFound` when the symbol was never fetched.
    fn get_price_series(&self, symbol: &str, field: PriceField) -> Result<PriceSeries, DataError>;

    /// Symbols currently available, in a stable order.
    fn available_symbols(&self) -> Vec<String>;
}
