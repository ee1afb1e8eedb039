//! CLI configuration structs bridging CLI arguments to domain types.
//!
//! These structs decouple the CLI parsing layer from the business logic,
//! allowing command handlers to work with validated, typed configurations.

use super::DataArgs;
use crate::data::{DataError, PriceField};
use crate::discovery::config::universe;
use crate::discovery::DiscoveryConfig;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when turning CLI arguments into configuration.
#[derive(Debug, Error)]
pub enum CliConfigError {
    #[error("Invalid date '{0}'. Expected format: YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Empty date window: start {start} is not before end {end}")]
    EmptyWindow { start: String, end: String },

    #[error("No data source given. Use --synthetic, --data-dir or --snapshot")]
    MissingSource,

    #[error("At least one symbol is required")]
    EmptySymbols,

    #[error(transparent)]
    PriceField(#[from] DataError),

    #[error("Invalid discovery configuration: {0}")]
    InvalidDiscovery(String),
}

/// Where bars are read from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSourceKind {
    Synthetic { seed: u64 },
    JsonDir(PathBuf),
    Snapshot(PathBuf),
}

/// Validated data source and date window.
#[derive(Debug, Clone)]
pub struct DataCliConfig {
    pub source: DataSourceKind,
    /// Window start (inclusive)
    pub start: DateTime<Utc>,
    /// Window end (exclusive)
    pub end: DateTime<Utc>,
}

impl DataCliConfig {
    /// Resolve the data arguments.
    ///
    /// Without `--start` the window covers `lookback_days` (falling back to
    /// `default_lookback_days`) before the end, which defaults to `now`.
    ///
    /// # Errors
    /// Returns `CliConfigError` for unparseable dates, an empty window or a
    /// missing data source.
    pub fn from_args(
        args: &DataArgs,
        default_lookback_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, CliConfigError> {
        let source = if let Some(path) = &args.snapshot {
            DataSourceKind::Snapshot(PathBuf::from(path))
        } else if let Some(dir) = &args.data_dir {
            DataSourceKind::JsonDir(PathBuf::from(dir))
        } else if args.synthetic {
            DataSourceKind::Synthetic { seed: args.seed }
        } else {
            return Err(CliConfigError::MissingSource);
        };

        let end = match &args.end {
            Some(raw) => parse_date(raw)?,
            None => now,
        };
        let start = match &args.start {
            Some(raw) => parse_date(raw)?,
            None => {
                let days = args.lookback_days.unwrap_or(default_lookback_days);
                end - Duration::days(i64::from(days))
            }
        };

        if start >= end {
            return Err(CliConfigError::EmptyWindow {
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
            });
        }

        Ok(Self { source, start, end })
    }
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, CliConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| CliConfigError::InvalidDate(raw.to_string()))
}

/// Expand a universe name or split a comma-separated symbol list.
///
/// Listed symbols are upper-cased to match ticker file names.
pub fn parse_symbols(raw: &str) -> Result<Vec<String>, CliConfigError> {
    if let Some(names) = universe(raw.trim()) {
        return Ok(names.iter().map(|s| s.to_string()).collect());
    }

    let symbols: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(CliConfigError::EmptySymbols);
    }
    Ok(symbols)
}

/// Discovery fields that CLI flags can override
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOverrides {
    pub symbols: Option<String>,
    pub coint_pvalue: Option<f64>,
    pub adf_pvalue: Option<f64>,
    pub min_observations: Option<usize>,
    pub price_field: Option<String>,
    pub workers: Option<usize>,
    pub progress_interval: Option<usize>,
    pub lookback_days: Option<u32>,
}

impl DiscoveryOverrides {
    /// Apply the overrides on top of `config` and validate the result.
    pub fn apply(self, mut config: DiscoveryConfig) -> Result<DiscoveryConfig, CliConfigError> {
        if let Some(raw) = &self.symbols {
            config.candidates = parse_symbols(raw)?;
        }
        if let Some(p) = self.coint_pvalue {
            config.thresholds.cointegration_pvalue_max = p;
        }
        if let Some(p) = self.adf_pvalue {
            config.thresholds.adf_pvalue_max = p;
        }
        if let Some(n) = self.min_observations {
            config.thresholds.min_observations = n;
        }
        if let Some(raw) = &self.price_field {
            config.price_field = raw.parse::<PriceField>()?;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(interval) = self.progress_interval {
            config.progress_interval = interval;
        }
        if let Some(days) = self.lookback_days {
            config.lookback_days = days;
        }

        config.validate().map_err(CliConfigError::InvalidDiscovery)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args() -> DataArgs {
        DataArgs {
            data_dir: None,
            synthetic: true,
            snapshot: None,
            seed: 7,
            lookback_days: None,
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-15").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        assert!(matches!(parse_date("15/03/2024"), Err(CliConfigError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols("energy").unwrap().len(), 10);
        assert_eq!(parse_symbols(" KO, PEP ,,").unwrap(), vec!["KO", "PEP"]);
        assert!(matches!(parse_symbols(" , "), Err(CliConfigError::EmptySymbols)));
    }

    #[test]
    fn test_listed_symbols_are_upper_cased() {
        assert_eq!(parse_symbols("ko,Pep, brk.b").unwrap(), vec!["KO", "PEP", "BRK.B"]);
        assert_eq!(parse_symbols("Energy").unwrap().len(), 10);
    }

    #[test]
    fn test_default_window_uses_lookback() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let config = DataCliConfig::from_args(&args(), 30, now).unwrap();

        assert_eq!(config.source, DataSourceKind::Synthetic { seed: 7 });
        assert_eq!(config.end, now);
        assert_eq!(config.start, now - Duration::days(30));
    }

    #[test]
    fn test_snapshot_takes_precedence() {
        let mut a = args();
        a.synthetic = false;
        a.snapshot = Some("snap.json".to_string());
        let config = DataCliConfig::from_args(&a, 30, Utc::now()).unwrap();
        assert_eq!(config.source, DataSourceKind::Snapshot(PathBuf::from("snap.json")));
    }

    #[test]
    fn test_missing_source_and_empty_window() {
        let mut a = args();
        a.synthetic = false;
        assert!(matches!(
            DataCliConfig::from_args(&a, 30, Utc::now()),
            Err(CliConfigError::MissingSource)
        ));

        let mut b = args();
        b.start = Some("2024-02-01".to_string());
        b.end = Some("2024-01-01".to_string());
        assert!(matches!(
            DataCliConfig::from_args(&b, 30, Utc::now()),
            Err(CliConfigError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_overrides_apply_and_validate() {
        let overrides = DiscoveryOverrides {
            symbols: Some("KO,PEP".to_string()),
            coint_pvalue: Some(0.01),
            price_field: Some("adj_close".to_string()),
            workers: Some(4),
            ..Default::default()
        };
        let config = overrides.apply(DiscoveryConfig::default()).unwrap();

        assert_eq!(config.candidates, vec!["KO", "PEP"]);
        assert_eq!(config.thresholds.cointegration_pvalue_max, 0.01);
        assert_eq!(config.thresholds.adf_pvalue_max, 0.05);
        assert_eq!(config.price_field, PriceField::AdjClose);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = DiscoveryOverrides {
            adf_pvalue: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            overrides.apply(DiscoveryConfig::default()),
            Err(CliConfigError::InvalidDiscovery(_))
        ));

        let bad_field = DiscoveryOverrides {
            price_field: Some("vwap".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_field.apply(DiscoveryConfig::default()),
            Err(CliConfigError::PriceField(_))
        ));
    }
}
