//! Pair discovery command handler.
//!
//! Implements the `discover-pairs` subcommand: load market data, screen
//! every pair of the universe, print the accepted pairs and write a JSON
//! report.

use super::fetch::load_market_data;
use crate::cli::{DataCliConfig, DataSourceKind};
use crate::data::{DataManager, MarketDataProvider, PriceField};
use crate::discovery::{
    DiscoveryConfig, FailureKind, PairEnumerator, PairOutcome, PairRecord, RejectionReason,
    ScanCancellation, ScanOptions, ScanReport, ThresholdConfig,
};
use crate::logging::ProgressLogger;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, warn};

/// Minimum spacing of progress log lines
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// JSON report written by `discover-pairs`
#[derive(Debug, Serialize)]
struct DiscoveryReport<'a> {
    generated_at: DateTime<Utc>,
    thresholds: &'a ThresholdConfig,
    price_field: PriceField,
    candidates: &'a [String],
    total_pairs: usize,
    processed: usize,
    cancelled: bool,
    pairs: Vec<PairRecord>,
    /// Pairs whose evaluation failed
    failures: Vec<&'a PairOutcome>,
}

/// Run the pair discovery pipeline.
///
/// `explicit_symbols` is set when the universe came from `--symbols` or a
/// config file. Otherwise a snapshot is screened over its own symbols.
/// Ctrl-C cancels the scan; pairs already evaluated are still reported.
///
/// # Errors
/// Returns error if market data cannot be loaded, the configuration is
/// invalid or the report cannot be written.
pub async fn run_discover_pairs(
    data: &DataCliConfig,
    mut config: DiscoveryConfig,
    explicit_symbols: bool,
    output_path: &str,
    show_rejected: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- PairScout: Pair Discovery ---");

    let from_snapshot = !explicit_symbols && matches!(data.source, DataSourceKind::Snapshot(_));
    let requested: &[String] = if from_snapshot { &[] } else { &config.candidates };
    let manager = load_market_data(data, requested).await?;
    config.candidates = screening_universe(&config.candidates, explicit_symbols, &data.source, &manager);

    info!(
        candidates = config.candidates.len(),
        coint_max = config.thresholds.cointegration_pvalue_max,
        adf_max = config.thresholds.adf_pvalue_max,
        min_obs = config.thresholds.min_observations,
        price_field = %config.price_field,
        workers = config.workers,
        "Configuration loaded"
    );

    let cancellation = ScanCancellation::new();
    let interrupt = cancellation.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight pairs");
            interrupt.cancel();
        }
    });

    let options = ScanOptions::from_config(&config).with_cancellation(cancellation);
    let thresholds = config.thresholds;
    let symbols = config.candidates.clone();

    // The scan is CPU-bound; keep it off the async workers
    let scan = tokio::task::spawn_blocking(move || {
        let progress = ProgressLogger::new(PROGRESS_LOG_INTERVAL);
        let callback = |processed: usize, total: usize| {
            progress.report(processed, total);
        };
        PairEnumerator::with_options(&manager, options).scan(&symbols, &thresholds, Some(&callback))
    })
    .await?;
    ctrl_c.abort();

    let report = match scan {
        Ok(report) => report,
        Err(e) => {
            error!("Discovery failed: {}", e);
            return Err(e.into());
        }
    };

    log_failures(&report);
    print_results(&report, show_rejected);

    let accepted = report.accepted();
    let document = DiscoveryReport {
        generated_at: Utc::now(),
        thresholds: &config.thresholds,
        price_field: config.price_field,
        candidates: &config.candidates,
        total_pairs: report.total_pairs,
        processed: report.processed,
        cancelled: report.cancelled,
        pairs: accepted,
        failures: report
            .outcomes
            .iter()
            .filter(|o| matches!(o, PairOutcome::Failed { .. }))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(output_path, &json)?;

    info!(
        output = output_path,
        pairs = document.pairs.len(),
        "Report saved"
    );
    println!("\n✓ Saved {} pairs to {}", document.pairs.len(), output_path);

    Ok(())
}

/// Symbols to screen.
///
/// A configured list is used as given. Without one, a snapshot supplies its
/// own symbols and other sources keep the default candidates.
fn screening_universe(
    configured: &[String],
    explicit_symbols: bool,
    source: &DataSourceKind,
    manager: &DataManager,
) -> Vec<String> {
    match source {
        DataSourceKind::Snapshot(path) if !explicit_symbols => {
            let symbols = manager.available_symbols();
            info!(path = %path.display(), symbols = symbols.len(), "Screening snapshot universe");
            symbols
        }
        _ => configured.to_vec(),
    }
}

fn log_failures(report: &ScanReport) {
    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
    for (_, _, failure) in report.failures() {
        *by_kind.entry(failure.kind.to_string()).or_default() += 1;
    }
    for (kind, count) in &by_kind {
        warn!(kind = %kind, count, "Pairs skipped after evaluation errors");
    }

    let missing = report
        .failures()
        .filter(|(_, _, f)| f.kind == FailureKind::SymbolNotFound)
        .count();
    if missing > 0 && missing == report.failed_count() && report.accepted_count() == 0 {
        warn!("Every failure was a missing symbol; was the data fetched for this universe?");
    }
}

fn print_results(report: &ScanReport, show_rejected: bool) {
    if report.cancelled {
        warn!(
            processed = report.processed,
            total = report.total_pairs,
            "Scan was cancelled, results are partial"
        );
    }

    let accepted = report.accepted();
    if accepted.is_empty() {
        warn!("No pairs found matching criteria");
    } else {
        println!("\n=== COINTEGRATED PAIRS ===");
        println!(
            "\n{:<16} | {:>8} | {:>8} | {:>8} | {:>10} | {:>10} | {:>5}",
            "Pair", "Coint-p", "ADF-p", "Hedge", "Spread Avg", "Spread Std", "Obs"
        );
        println!("{}", "-".repeat(84));
        for pair in &accepted {
            println!(
                "{:<16} | {:>8.4} | {:>8.4} | {:>8.4} | {:>10.4} | {:>10.4} | {:>5}",
                pair.label(),
                pair.cointegration_pvalue,
                pair.adf_pvalue,
                pair.hedge_ratio,
                pair.spread_mean,
                pair.spread_std,
                pair.observations
            );
        }
    }

    if show_rejected {
        println!("\n=== NOT ACCEPTED ===");
        for outcome in &report.outcomes {
            let (symbol1, symbol2) = outcome.symbols();
            let detail = match outcome {
                PairOutcome::Accepted(_) => continue,
                PairOutcome::Rejected {
                    reason: RejectionReason::InsufficientData { observations, required },
                    ..
                } => format!("insufficient data ({} < {})", observations, required),
                PairOutcome::Rejected {
                    reason:
                        RejectionReason::ThresholdNotMet {
                            cointegration_pvalue,
                            adf_pvalue,
                        },
                    ..
                } => format!(
                    "coint-p {:.4}, adf-p {:.4}",
                    cointegration_pvalue, adf_pvalue
                ),
                PairOutcome::Failed { failure, .. } => {
                    format!("failed ({}): {}", failure.kind, failure.message)
                }
            };
            println!("{:<16} | {}", format!("{}/{}", symbol1, symbol2), detail);
        }
    }

    println!(
        "\nScreened {} of {} pairs: {} accepted, {} rejected, {} failed",
        report.processed,
        report.total_pairs,
        report.accepted_count(),
        report.rejected_count(),
        report.failed_count()
    );
}
