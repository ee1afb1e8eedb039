//! Per-pair results of a discovery scan

use super::error::DiscoveryError;
use crate::data::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pair that passed both thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    /// Regression target (earlier in the candidate list)
    pub symbol1: String,
    /// Regressor (later in the candidate list)
    pub symbol2: String,
    pub hedge_ratio: f64,
    pub cointegration_pvalue: f64,
    pub adf_pvalue: f64,
    pub spread_mean: f64,
    pub spread_std: f64,
    /// Aligned observations behind the statistics
    pub observations: usize,
}

impl PairRecord {
    /// `"SYMBOL1/SYMBOL2"`
    pub fn label(&self) -> String {
        format!("{}/{}", self.symbol1, self.symbol2)
    }
}

/// Why a successfully evaluated pair was not accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// Fewer aligned observations than `min_observations`
    InsufficientData { observations: usize, required: usize },
    /// At least one p-value above its threshold
    ThresholdNotMet {
        cointegration_pvalue: f64,
        adf_pvalue: f64,
    },
}

/// Category of a per-pair failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SymbolNotFound,
    DataFetch,
    StatisticalComputation,
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::SymbolNotFound => "symbol not found",
            FailureKind::DataFetch => "data fetch",
            FailureKind::StatisticalComputation => "statistical computation",
            FailureKind::Unexpected => "unexpected",
        };
        write!(f, "{}", name)
    }
}

/// A pair whose evaluation failed; the scan carried on without it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl PairFailure {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Unexpected,
            message: message.into(),
        }
    }
}

impl From<DiscoveryError> for PairFailure {
    fn from(error: DiscoveryError) -> Self {
        let kind = match &error {
            DiscoveryError::Data(DataError::SymbolNotFound(_)) => FailureKind::SymbolNotFound,
            DiscoveryError::Data(_) => FailureKind::DataFetch,
            DiscoveryError::Statistical(_) | DiscoveryError::InsufficientData { .. } => {
                FailureKind::StatisticalComputation
            }
            _ => FailureKind::Unexpected,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

impl From<DataError> for PairFailure {
    fn from(error: DataError) -> Self {
        DiscoveryError::from(error).into()
    }
}

/// Result of evaluating one candidate pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    Accepted(PairRecord),
    Rejected {
        symbol1: String,
        symbol2: String,
        #[serde(flatten)]
        reason: RejectionReason,
    },
    Failed {
        symbol1: String,
        symbol2: String,
        #[serde(flatten)]
        failure: PairFailure,
    },
}

impl PairOutcome {
    /// The two symbols of this outcome, in enumeration order
    pub fn symbols(&self) -> (&str, &str) {
        match self {
            PairOutcome::Accepted(record) => (&record.symbol1, &record.symbol2),
            PairOutcome::Rejected { symbol1, symbol2, .. }
            | PairOutcome::Failed { symbol1, symbol2, .. } => (symbol1, symbol2),
        }
    }

    pub fn record(&self) -> Option<&PairRecord> {
        match self {
            PairOutcome::Accepted(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, PairOutcome::Accepted(_))
    }
}

/// Everything a scan produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Outcomes in enumeration order
    pub outcomes: Vec<PairOutcome>,
    /// Number of pairs the universe yields
    pub total_pairs: usize,
    /// Number of pairs actually evaluated
    pub processed: usize,
    /// Set when the scan stopped early on cancellation
    pub cancelled: bool,
}

impl ScanReport {
    /// Accepted records in enumeration order
    pub fn accepted(&self) -> Vec<PairRecord> {
        self.outcomes
            .iter()
            .filter_map(PairOutcome::record)
            .cloned()
            .collect()
    }

    /// Consume the report, keeping only accepted records
    pub fn into_accepted(self) -> Vec<PairRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                PairOutcome::Accepted(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PairOutcome::Rejected { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PairOutcome::Failed { .. }))
            .count()
    }

    /// Failed pairs in scan order
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str, &PairFailure)> {
        self.outcomes.iter().filter_map(|o| match o {
            PairOutcome::Failed {
                symbol1,
                symbol2,
                failure,
            } => Some((symbol1.as_str(), symbol2.as_str(), failure)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::StatsError;

    #[test]
    fn test_failure_classification() {
        let missing: PairFailure = DataError::SymbolNotFound("C".into()).into();
        assert_eq!(missing.kind, FailureKind::SymbolNotFound);

        let fetch: PairFailure = DataError::Fetch {
            symbol: "C".into(),
            reason: "timeout".into(),
        }
        .into();
        assert_eq!(fetch.kind, FailureKind::DataFetch);

        let stats: PairFailure = DiscoveryError::Statistical(StatsError::ConstantSeries).into();
        assert_eq!(stats.kind, FailureKind::StatisticalComputation);
    }

    #[test]
    fn test_report_counts() {
        let record = PairRecord {
            symbol1: "A".into(),
            symbol2: "B".into(),
            hedge_ratio: 1.0,
            cointegration_pvalue: 0.01,
            adf_pvalue: 0.01,
            spread_mean: 0.0,
            spread_std: 1.0,
            observations: 100,
        };
        let report = ScanReport {
            outcomes: vec![
                PairOutcome::Accepted(record.clone()),
                PairOutcome::Rejected {
                    symbol1: "A".into(),
                    symbol2: "C".into(),
                    reason: RejectionReason::ThresholdNotMet {
                        cointegration_pvalue: 0.5,
                        adf_pvalue: 0.5,
                    },
                },
                PairOutcome::Failed {
                    symbol1: "B".into(),
                    symbol2: "C".into(),
                    failure: PairFailure::unexpected("boom"),
                },
            ],
            total_pairs: 3,
            processed: 3,
            cancelled: false,
        };

        assert_eq!(report.accepted(), vec![record]);
        assert_eq!(report.accepted_count(), 1);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failures().next().map(|(a, b, _)| (a, b)), Some(("B", "C")));
    }

    #[test]
    fn test_failures_keep_scan_order() {
        let failed = |a: &str, b: &str, failure: PairFailure| PairOutcome::Failed {
            symbol1: a.into(),
            symbol2: b.into(),
            failure,
        };
        let report = ScanReport {
            outcomes: vec![
                failed("A", "B", PairFailure::unexpected("boom")),
                failed("A", "C", DataError::SymbolNotFound("C".into()).into()),
                failed("B", "C", PairFailure::unexpected("boom")),
            ],
            total_pairs: 3,
            processed: 3,
            cancelled: false,
        };

        let order: Vec<_> = report
            .failures()
            .map(|(a, b, f)| (a, b, f.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A", "B", FailureKind::Unexpected),
                ("A", "C", FailureKind::SymbolNotFound),
                ("B", "C", FailureKind::Unexpected),
            ]
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = PairOutcome::Failed {
            symbol1: "A".into(),
            symbol2: "B".into(),
            failure: PairFailure::unexpected("boom"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "unexpected");
        assert_eq!(json["symbol1"], "A");
    }
}
