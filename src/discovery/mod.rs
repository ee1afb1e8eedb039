//! Cointegrated Pair Discovery Module
//!
//! Screens a symbol universe for statistically cointegrated pairs:
//! every unordered pair is aligned on shared timestamps, tested with
//! Engle-Granger, its hedged spread checked for stationarity with ADF, and
//! pairs passing both p-value thresholds are summarised.
//!
//! # Example
//!
//! ```ignore
//! use pairscout::data::{DataManager, SyntheticSource};
//! use pairscout::discovery::{PairEnumerator, ThresholdConfig};
//!
//! let mut manager = DataManager::new(start, end);
//! manager.fetch(&SyntheticSource::default(), &symbols).await;
//! let pairs = PairEnumerator::new(&manager).find_pairs(&symbols, &ThresholdConfig::default(), None)?;
//! ```

pub mod align;
pub mod cointegration;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod outcome;
pub mod spread;

pub use align::{align, AlignedPair};
pub use cointegration::{CointegrationResult, CointegrationTester};
pub use config::{DiscoveryConfig, ThresholdConfig, DEFAULT_CANDIDATES};
pub use enumerator::{
    pair_count, pair_tasks, PairEnumerator, PairTask, ProgressCallback, ScanCancellation,
    ScanOptions,
};
pub use error::DiscoveryError;
pub use outcome::{FailureKind, PairFailure, PairOutcome, PairRecord, RejectionReason, ScanReport};
pub use spread::{spread_series, SpreadStatistics};
