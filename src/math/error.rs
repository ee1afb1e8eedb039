//! Error types for the statistical kernel

use thiserror::Error;

/// Numerical failures raised by the regression and unit-root routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Design matrix is rank deficient (collinear or all-zero regressors)
    #[error("Singular design matrix ({columns} regressors, {rows} observations)")]
    SingularDesign { rows: usize, columns: usize },

    /// Not enough observations for the requested model
    #[error("Sample too short: need at least {required} observations, got {actual}")]
    SampleTooShort { required: usize, actual: usize },

    /// Input slices that must be paired have different lengths
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Series has no variation at all
    #[error("Series is constant")]
    ConstantSeries,

    /// NaN or infinite values in the input or an intermediate result
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// No MacKinnon response-surface table for this configuration
    #[error("No MacKinnon table for {n_vars} variables")]
    UnsupportedTable { n_vars: usize },

    /// Distribution construction failed
    #[error("Distribution error: {0}")]
    Distribution(String),
}
