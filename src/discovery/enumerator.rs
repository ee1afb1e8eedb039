//! Pair enumeration over a symbol universe
//!
//! Every unordered pair `(i, j)` with `i < j` in input order is evaluated
//! independently: fetch both series, align, test, filter by thresholds and
//! summarise the spread of accepted pairs. A failing pair never stops the
//! scan; it is recorded as [`PairOutcome::Failed`] and the scan moves on.

use super::align::align;
use super::cointegration::CointegrationTester;
use super::config::{DiscoveryConfig, ThresholdConfig};
use super::error::DiscoveryError;
use super::outcome::{PairFailure, PairOutcome, PairRecord, RejectionReason, ScanReport};
use super::spread::SpreadStatistics;
use crate::data::{MarketDataProvider, PriceField};

use rayon::prelude::*;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Progress callback: `(processed, total)`
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Cooperative cancellation flag, checked before each pair evaluation.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ScanCancellation {
    cancelled: Arc<AtomicBool>,
}

impl ScanCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; pairs already being evaluated finish normally.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Execution options of a scan (thresholds are passed per call)
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Invoke the progress callback every this many processed pairs
    pub progress_interval: usize,
    /// Worker threads; 1 evaluates sequentially on the calling thread
    pub workers: usize,
    /// Bar field read from the provider
    pub price_field: PriceField,
    pub cancellation: Option<ScanCancellation>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            progress_interval: 10,
            workers: 1,
            price_field: PriceField::Close,
            cancellation: None,
        }
    }
}

impl ScanOptions {
    /// Options matching a discovery config
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            progress_interval: config.progress_interval,
            workers: config.workers,
            price_field: config.price_field,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, cancellation: ScanCancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval == 0 {
            return Err("progress_interval must be at least 1".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be at least 1".to_string());
        }
        Ok(())
    }
}

/// One unit of work: the pair `(first, second)` at position `index` in
/// enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairTask {
    pub index: usize,
    pub first: usize,
    pub second: usize,
}

/// Number of unordered pairs over `n` symbols
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Lazy `i < j` pair sequence over `n` symbols
#[derive(Debug, Clone)]
pub struct PairTasks {
    n: usize,
    first: usize,
    second: usize,
    index: usize,
}

/// Enumerate all pairs over `n` symbols without materialising them.
pub fn pair_tasks(n: usize) -> PairTasks {
    PairTasks {
        n,
        first: 0,
        second: 1,
        index: 0,
    }
}

impl Iterator for PairTasks {
    type Item = PairTask;

    fn next(&mut self) -> Option<PairTask> {
        if self.second >= self.n {
            return None;
        }
        let task = PairTask {
            index: self.index,
            first: self.first,
            second: self.second,
        };

        self.index += 1;
        self.second += 1;
        if self.second >= self.n {
            self.first += 1;
            self.second = self.first + 1;
        }
        Some(task)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = pair_count(self.n) - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PairTasks {}

/// Shared state of a parallel scan, behind one lock
struct Accumulator {
    outcomes: Vec<(usize, PairOutcome)>,
    processed: usize,
}

/// Screens every pair of a symbol universe for cointegration
pub struct PairEnumerator<'a, P: MarketDataProvider + ?Sized> {
    provider: &'a P,
    options: ScanOptions,
}

impl<'a, P: MarketDataProvider + ?Sized> PairEnumerator<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self::with_options(provider, ScanOptions::default())
    }

    pub fn with_options(provider: &'a P, options: ScanOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Accepted pairs in enumeration order.
    ///
    /// # Errors
    /// Only `DiscoveryError::InvalidConfig`, before any pair is evaluated.
    pub fn find_pairs(
        &self,
        symbols: &[String],
        thresholds: &ThresholdConfig,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<Vec<PairRecord>, DiscoveryError> {
        Ok(self.scan(symbols, thresholds, progress)?.into_accepted())
    }

    /// Evaluate every pair and report each outcome.
    ///
    /// # Errors
    /// Only `DiscoveryError::InvalidConfig`, before any pair is evaluated.
    pub fn scan(
        &self,
        symbols: &[String],
        thresholds: &ThresholdConfig,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<ScanReport, DiscoveryError> {
        thresholds.validate().map_err(DiscoveryError::InvalidConfig)?;
        self.options.validate().map_err(DiscoveryError::InvalidConfig)?;

        let universe = unique_symbols(symbols);
        let total = pair_count(universe.len());
        let tester = CointegrationTester::new(thresholds.min_observations);

        info!(
            symbols = universe.len(),
            pairs = total,
            coint_max = thresholds.cointegration_pvalue_max,
            adf_max = thresholds.adf_pvalue_max,
            min_obs = thresholds.min_observations,
            workers = self.options.workers,
            "Analyzing pair candidates"
        );

        let mut report = if self.options.workers > 1 {
            self.scan_parallel(&universe, &tester, thresholds, progress)?
        } else {
            self.scan_sequential(&universe, &tester, thresholds, progress)
        };
        report.total_pairs = total;

        if report.cancelled {
            warn!(
                processed = report.processed,
                total, "Scan cancelled before completion"
            );
        }
        info!(
            accepted = report.accepted_count(),
            rejected = report.rejected_count(),
            failed = report.failed_count(),
            total,
            "Scan complete"
        );

        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancellation
            .as_ref()
            .is_some_and(ScanCancellation::is_cancelled)
    }

    fn report_progress(&self, progress: Option<ProgressCallback<'_>>, processed: usize, total: usize) {
        if let Some(callback) = progress {
            if processed % self.options.progress_interval == 0 || processed == total {
                callback(processed, total);
            }
        }
    }

    fn scan_sequential(
        &self,
        universe: &[String],
        tester: &CointegrationTester,
        thresholds: &ThresholdConfig,
        progress: Option<ProgressCallback<'_>>,
    ) -> ScanReport {
        let total = pair_count(universe.len());
        let mut report = ScanReport {
            outcomes: Vec::with_capacity(total),
            ..Default::default()
        };

        for task in pair_tasks(universe.len()) {
            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let outcome = self.evaluate(
                tester,
                thresholds,
                &universe[task.first],
                &universe[task.second],
            );
            report.outcomes.push(outcome);
            report.processed = task.index + 1;
            self.report_progress(progress, report.processed, total);
        }

        report
    }

    fn scan_parallel(
        &self,
        universe: &[String],
        tester: &CointegrationTester,
        thresholds: &ThresholdConfig,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<ScanReport, DiscoveryError> {
        let total = pair_count(universe.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .build()
            .map_err(|e| DiscoveryError::InvalidConfig(format!("cannot build worker pool: {}", e)))?;

        let accumulator = Mutex::new(Accumulator {
            outcomes: Vec::with_capacity(total),
            processed: 0,
        });

        pool.install(|| {
            pair_tasks(universe.len()).par_bridge().for_each(|task| {
                if self.is_cancelled() {
                    return;
                }
                let outcome = self.evaluate(
                    tester,
                    thresholds,
                    &universe[task.first],
                    &universe[task.second],
                );

                let mut acc = accumulator.lock().unwrap_or_else(PoisonError::into_inner);
                acc.outcomes.push((task.index, outcome));
                acc.processed += 1;
                self.report_progress(progress, acc.processed, total);
            });
        });

        let Accumulator {
            mut outcomes,
            processed,
        } = accumulator.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcomes.sort_by_key(|(index, _)| *index);

        Ok(ScanReport {
            outcomes: outcomes.into_iter().map(|(_, outcome)| outcome).collect(),
            total_pairs: total,
            processed,
            cancelled: processed < total && self.is_cancelled(),
        })
    }

    /// Evaluate one pair, converting errors and panics into `Failed`.
    fn evaluate(
        &self,
        tester: &CointegrationTester,
        thresholds: &ThresholdConfig,
        symbol1: &str,
        symbol2: &str,
    ) -> PairOutcome {
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.evaluate_pair(tester, thresholds, symbol1, symbol2)
        }));

        let failure = match result {
            Ok(Ok(outcome)) => return outcome,
            Ok(Err(e)) => PairFailure::from(e),
            Err(payload) => PairFailure::unexpected(panic_message(payload.as_ref())),
        };

        debug!(
            pair = format!("{}-{}", symbol1, symbol2),
            kind = %failure.kind,
            error = %failure.message,
            "Pair evaluation failed, skipping"
        );
        PairOutcome::Failed {
            symbol1: symbol1.to_string(),
            symbol2: symbol2.to_string(),
            failure,
        }
    }

    fn evaluate_pair(
        &self,
        tester: &CointegrationTester,
        thresholds: &ThresholdConfig,
        symbol1: &str,
        symbol2: &str,
    ) -> Result<PairOutcome, DiscoveryError> {
        let field = self.options.price_field;
        let series1 = self.provider.get_price_series(symbol1, field)?;
        let series2 = self.provider.get_price_series(symbol2, field)?;

        // One alignment feeds both the test and the spread statistics
        let aligned = align(&series1, &series2);
        let result = tester.test_aligned(&aligned)?;

        if result.observations < tester.min_observations() {
            debug!(
                pair = format!("{}-{}", symbol1, symbol2),
                observations = result.observations,
                required = tester.min_observations(),
                "Not enough aligned observations"
            );
            return Ok(PairOutcome::Rejected {
                symbol1: symbol1.to_string(),
                symbol2: symbol2.to_string(),
                reason: RejectionReason::InsufficientData {
                    observations: result.observations,
                    required: tester.min_observations(),
                },
            });
        }

        if !thresholds.accepts(result.cointegration_pvalue, result.adf_pvalue) {
            debug!(
                pair = format!("{}-{}", symbol1, symbol2),
                coint_p = format!("{:.4}", result.cointegration_pvalue),
                adf_p = format!("{:.4}", result.adf_pvalue),
                "Thresholds not met"
            );
            return Ok(PairOutcome::Rejected {
                symbol1: symbol1.to_string(),
                symbol2: symbol2.to_string(),
                reason: RejectionReason::ThresholdNotMet {
                    cointegration_pvalue: result.cointegration_pvalue,
                    adf_pvalue: result.adf_pvalue,
                },
            });
        }

        let spread = SpreadStatistics::from_aligned(&aligned, result.hedge_ratio)?;

        info!(
            pair = format!("{}-{}", symbol1, symbol2),
            coint_p = format!("{:.4}", result.cointegration_pvalue),
            adf_p = format!("{:.4}", result.adf_pvalue),
            hedge_ratio = format!("{:.4}", result.hedge_ratio),
            "Found pair"
        );

        Ok(PairOutcome::Accepted(PairRecord {
            symbol1: symbol1.to_string(),
            symbol2: symbol2.to_string(),
            hedge_ratio: result.hedge_ratio,
            cointegration_pvalue: result.cointegration_pvalue,
            adf_pvalue: result.adf_pvalue,
            spread_mean: spread.mean,
            spread_std: spread.std,
            observations: result.observations,
        }))
    }
}

/// Drop repeated symbols, keeping the first occurrence
fn unique_symbols(symbols: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(symbols.len());
    let mut unique = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if seen.insert(symbol.as_str()) {
            unique.push(symbol.clone());
        } else {
            warn!(symbol = %symbol, "Duplicate symbol ignored");
        }
    }
    unique
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic during pair evaluation".to_string()
    }
}
