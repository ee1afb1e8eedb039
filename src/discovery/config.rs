//! Configuration for pair discovery

use crate::data::PriceField;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::DiscoveryError;

/// Default universe: large-cap US technology names
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX", "ADBE", "CRM",
];

/// Financials
pub const FINANCIAL_CANDIDATES: &[&str] = &[
    "JPM", "BAC", "WFC", "GS", "MS", "C", "USB", "PNC", "TFC", "COF",
];

/// Healthcare
pub const HEALTHCARE_CANDIDATES: &[&str] = &[
    "JNJ", "PFE", "UNH", "MRK", "ABT", "TMO", "DHR", "BMY", "AMGN", "GILD",
];

/// Energy
pub const ENERGY_CANDIDATES: &[&str] = &[
    "XOM", "CVX", "COP", "EOG", "SLB", "PSX", "VLO", "MPC", "OXY", "KMI",
];

/// Look up a named universe ("tech", "financial", "healthcare", "energy")
pub fn universe(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "default" | "tech" => Some(DEFAULT_CANDIDATES),
        "financial" | "financials" => Some(FINANCIAL_CANDIDATES),
        "healthcare" => Some(HEALTHCARE_CANDIDATES),
        "energy" => Some(ENERGY_CANDIDATES),
        _ => None,
    }
}

/// Acceptance thresholds for a single scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Maximum Engle-Granger p-value (inclusive)
    #[serde(default = "default_pvalue_max")]
    pub cointegration_pvalue_max: f64,

    /// Maximum ADF p-value on the hedged spread (inclusive)
    #[serde(default = "default_pvalue_max")]
    pub adf_pvalue_max: f64,

    /// Minimum number of aligned observations
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
}

fn default_pvalue_max() -> f64 {
    0.05
}
fn default_min_observations() -> usize {
    30
}
fn default_progress_interval() -> usize {
    10
}
fn default_workers() -> usize {
    1
}
fn default_lookback_days() -> u32 {
    365 * 4
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cointegration_pvalue_max: default_pvalue_max(),
            adf_pvalue_max: default_pvalue_max(),
            min_observations: default_min_observations(),
        }
    }
}

impl ThresholdConfig {
    /// Validate thresholds
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("cointegration_pvalue_max", self.cointegration_pvalue_max),
            ("adf_pvalue_max", self.adf_pvalue_max),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(format!("{} must be in (0, 1], got {}", name, value));
            }
        }
        if self.min_observations < 2 {
            return Err(format!(
                "min_observations must be at least 2, got {}",
                self.min_observations
            ));
        }
        Ok(())
    }

    /// True when both p-values are within bounds (inclusive)
    pub fn accepts(&self, cointegration_pvalue: f64, adf_pvalue: f64) -> bool {
        cointegration_pvalue <= self.cointegration_pvalue_max && adf_pvalue <= self.adf_pvalue_max
    }
}

/// Configuration for a discovery run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Candidate symbols, enumeration order
    pub candidates: Vec<String>,

    #[serde(flatten)]
    pub thresholds: ThresholdConfig,

    /// Bar field used as the price
    #[serde(default)]
    pub price_field: PriceField,

    /// Invoke the progress callback every this many pairs
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    /// Size of the evaluation worker pool (1 = sequential)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Historical lookback period in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            thresholds: ThresholdConfig::default(),
            price_field: PriceField::default(),
            progress_interval: default_progress_interval(),
            workers: default_workers(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl DiscoveryConfig {
    /// Create a config with custom candidates
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, DiscoveryError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.candidates.len() < 2 {
            return Err("need at least 2 candidates to form pairs".to_string());
        }
        self.thresholds.validate()?;
        if self.progress_interval == 0 {
            return Err("progress_interval must be at least 1".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be at least 1".to_string());
        }
        if self.lookback_days == 0 {
            return Err("lookback_days must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DiscoveryConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_candidate_invalid() {
        let config = DiscoveryConfig::with_candidates(vec!["AAPL".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_observations_below_two_invalid() {
        let thresholds = ThresholdConfig {
            min_observations: 1,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_pvalue_bounds() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let thresholds = ThresholdConfig {
                adf_pvalue_max: bad,
                ..Default::default()
            };
            assert!(thresholds.validate().is_err(), "{} accepted", bad);
        }
        let edge = ThresholdConfig {
            cointegration_pvalue_max: 1.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_accepts_is_inclusive() {
        let thresholds = ThresholdConfig::default();
        assert!(thresholds.accepts(0.05, 0.05));
        assert!(!thresholds.accepts(0.0500001, 0.01));
        assert!(!thresholds.accepts(0.01, 0.06));
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let json = r#"{ "candidates": ["XOM", "CVX"], "adf_pvalue_max": 0.1 }"#;
        let config: DiscoveryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.candidates, vec!["XOM", "CVX"]);
        assert_eq!(config.thresholds.adf_pvalue_max, 0.1);
        assert_eq!(config.thresholds.cointegration_pvalue_max, 0.05);
        assert_eq!(config.thresholds.min_observations, 30);
        assert_eq!(config.progress_interval, 10);
        assert_eq!(config.price_field, PriceField::Close);
    }

    #[test]
    fn test_named_universes() {
        assert_eq!(universe("Energy").map(|u| u.len()), Some(10));
        assert!(universe("crypto").is_none());
    }
}
