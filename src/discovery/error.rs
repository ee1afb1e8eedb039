//! Error types for the discovery module

use crate::data::DataError;
use crate::math::StatsError;
use thiserror::Error;

/// Errors that can occur during pair discovery
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Invalid configuration, rejected before a scan starts
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Insufficient historical data for analysis
    #[error("Insufficient data: expected at least {expected} data points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical failure in the regression or the statistical tests
    #[error("Statistical computation failed: {0}")]
    Statistical(#[from] StatsError),

    /// Market data error (missing symbol, failed fetch)
    #[error(transparent)]
    Data(#[from] DataError),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
