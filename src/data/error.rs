//! Error types for the market data layer

use thiserror::Error;

/// Errors raised by price sources and the data manager
#[derive(Error, Debug)]
pub enum DataError {
    /// Symbol was never fetched (or the fetch returned nothing)
    #[error("Data for {0} not found. Fetch data first.")]
    SymbolNotFound(String),

    /// Source failed to deliver bars for a symbol
    #[error("Failed to fetch {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    /// Series violates the strictly-increasing timestamp contract
    #[error("Invalid series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    /// Unknown price field name
    #[error("Unknown price field: {0}")]
    UnknownField(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
