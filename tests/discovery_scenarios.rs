//! End-to-end discovery scenarios against mocked and synthetic market data.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::mock;
use mockall::predicate::*;
use pairscout::data::{
    DataError, DataManager, MarketDataProvider, PriceField, PriceSeries, SyntheticSource,
};
use pairscout::discovery::{
    CointegrationTester, FailureKind, PairEnumerator, PairOutcome, ScanOptions, SpreadStatistics,
    ThresholdConfig,
};
use std::collections::HashMap;
use std::sync::Mutex;

// --- Mocks ---

mock! {
    pub Provider {}

    impl MarketDataProvider for Provider {
        fn get_price_series(&self, symbol: &str, field: PriceField) -> Result<PriceSeries, DataError>;
        fn available_symbols(&self) -> Vec<String>;
    }
}

// --- Fixtures ---

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) as f64) / ((1u64 << 31) as f64) - 0.5
        })
        .collect()
}

fn walk(n: usize, seed: u64) -> Vec<f64> {
    let mut level = 100.0;
    noise(n, seed)
        .into_iter()
        .map(|e| {
            level += e;
            level
        })
        .collect()
}

fn series(symbol: &str, prices: &[f64]) -> PriceSeries {
    PriceSeries::from_pairs(
        symbol,
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| (start() + Duration::days(i as i64), *p)),
    )
    .unwrap()
}

/// A and B follow one random walk, C an independent one
fn abc_universe() -> HashMap<String, PriceSeries> {
    let n = 300;
    let factor = walk(n, 11);
    let a: Vec<f64> = factor
        .iter()
        .zip(noise(n, 12))
        .map(|(f, e)| 1.5 * f + e)
        .collect();
    let b: Vec<f64> = factor.iter().zip(noise(n, 13)).map(|(f, e)| f + e).collect();

    let mut universe = HashMap::new();
    universe.insert("A".to_string(), series("A", &a));
    universe.insert("B".to_string(), series("B", &b));
    universe.insert("C".to_string(), series("C", &walk(n, 14)));
    universe
}

fn strict() -> ThresholdConfig {
    ThresholdConfig {
        cointegration_pvalue_max: 0.01,
        adf_pvalue_max: 0.01,
        ..Default::default()
    }
}

fn symbols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// --- Tests ---

#[test]
fn test_only_cointegrated_pair_is_reported() {
    let universe = abc_universe();
    let mut provider = MockProvider::new();
    provider
        .expect_get_price_series()
        .with(always(), eq(PriceField::Close))
        .returning(move |symbol, _| {
            universe
                .get(symbol)
                .cloned()
                .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
        });

    let pairs = PairEnumerator::new(&provider)
        .find_pairs(&symbols(&["A", "B", "C"]), &strict(), None)
        .unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].symbol1, "A");
    assert_eq!(pairs[0].symbol2, "B");
    assert!((pairs[0].hedge_ratio - 1.5).abs() < 0.05);
    assert!(pairs[0].cointegration_pvalue <= 0.01);
    assert!(pairs[0].adf_pvalue <= 0.01);
}

#[test]
fn test_failing_symbol_does_not_abort_scan() {
    let mut universe = abc_universe();
    universe.remove("C");

    let mut provider = MockProvider::new();
    provider
        .expect_get_price_series()
        .with(eq("C"), always())
        .returning(|symbol, _| Err(DataError::SymbolNotFound(symbol.to_string())));
    provider
        .expect_get_price_series()
        .returning(move |symbol, _| {
            universe
                .get(symbol)
                .cloned()
                .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
        });

    let report = PairEnumerator::new(&provider)
        .scan(&symbols(&["A", "B", "C"]), &strict(), None)
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.accepted().len(), 1);
    assert_eq!(report.failed_count(), 2);
    assert!(report
        .failures()
        .all(|(_, _, f)| f.kind == FailureKind::SymbolNotFound));
}

#[test]
fn test_identical_series_is_perfectly_cointegrated() {
    let prices = walk(250, 21);
    let a = series("A", &prices);
    let b = series("B", &prices);

    let result = CointegrationTester::new(30).test(&a, &b).unwrap();
    assert!((result.hedge_ratio - 1.0).abs() < 1e-9);
    assert!(result.cointegration_pvalue < 1e-6);
    assert!(result.adf_pvalue < 1e-6);

    let stats = SpreadStatistics::compute(&a, &b, result.hedge_ratio).unwrap();
    assert!(stats.mean.abs() < 1e-9);
    assert!(stats.std.abs() < 1e-9);
}

#[test]
fn test_spread_statistics_describe_tested_residual() {
    let universe = abc_universe();
    let a = &universe["A"];
    let b = &universe["B"];

    // Drop every fifth day from B so alignment matters
    let b_sparse = PriceSeries::new(
        "B",
        b.points()
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 5 != 0)
            .map(|(_, p)| *p)
            .collect(),
    )
    .unwrap();

    let mut provider = MockProvider::new();
    let a_clone = a.clone();
    let b_clone = b_sparse.clone();
    provider
        .expect_get_price_series()
        .returning(move |symbol, _| match symbol {
            "A" => Ok(a_clone.clone()),
            "B" => Ok(b_clone.clone()),
            other => Err(DataError::SymbolNotFound(other.to_string())),
        });

    let pairs = PairEnumerator::new(&provider)
        .find_pairs(&symbols(&["A", "B"]), &ThresholdConfig::default(), None)
        .unwrap();
    assert_eq!(pairs.len(), 1);

    let record = &pairs[0];
    let expected = SpreadStatistics::compute(a, &b_sparse, record.hedge_ratio).unwrap();
    assert_eq!(record.observations, 240);
    assert!((record.spread_mean - expected.mean).abs() < 1e-12);
    assert!((record.spread_std - expected.std).abs() < 1e-12);
}

#[test]
fn test_progress_reported_for_full_universe() {
    let universe = abc_universe();
    let mut provider = MockProvider::new();
    provider.expect_get_price_series().returning(move |symbol, _| {
        universe
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    });

    let calls = Mutex::new(Vec::new());
    let callback = |done: usize, total: usize| calls.lock().unwrap().push((done, total));

    // Ten symbols, 45 pairs; seven of them are unknown to the provider
    let universe_symbols = symbols(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]);
    let report = PairEnumerator::new(&provider)
        .scan(&universe_symbols, &ThresholdConfig::default(), Some(&callback))
        .unwrap();

    assert_eq!(report.total_pairs, 45);
    assert_eq!(
        calls.into_inner().unwrap(),
        vec![(10, 45), (20, 45), (30, 45), (40, 45), (45, 45)]
    );
}

#[tokio::test]
async fn test_synthetic_same_factor_symbols_pair_up() {
    let source = SyntheticSource::new(7, 2);
    let candidates = symbols(&["KO", "PEP", "XOM", "CVX", "JPM", "BAC"]);

    // Pick two symbols on the same factor
    let (first, second) = candidates
        .iter()
        .enumerate()
        .flat_map(|(i, a)| candidates[i + 1..].iter().map(move |b| (a, b)))
        .find(|(a, b)| source.factor_of(a) == source.factor_of(b))
        .expect("six symbols over two factors always share one");

    let mut manager = DataManager::new(start(), start() + Duration::days(730));
    let fetched = manager.fetch(&source, &candidates).await;
    assert_eq!(fetched.len(), candidates.len());

    let options = ScanOptions {
        workers: 3,
        ..Default::default()
    };
    let report = PairEnumerator::with_options(&manager, options)
        .scan(&candidates, &ThresholdConfig::default(), None)
        .unwrap();

    assert_eq!(report.total_pairs, 15);
    assert_eq!(report.failed_count(), 0);
    assert!(report
        .accepted()
        .iter()
        .any(|p| &p.symbol1 == first && &p.symbol2 == second));
}

#[tokio::test]
async fn test_snapshot_round_trip_gives_same_scan() {
    let source = SyntheticSource::new(3, 2);
    let candidates = symbols(&["AAA", "BBB", "CCC", "DDD"]);
    let mut manager = DataManager::new(start(), start() + Duration::days(400));
    manager.fetch(&source, &candidates).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    manager.save(&path).unwrap();
    let loaded = DataManager::load(&path).unwrap();

    let thresholds = ThresholdConfig::default();
    let before = PairEnumerator::new(&manager)
        .scan(&candidates, &thresholds, None)
        .unwrap();
    let after = PairEnumerator::new(&loaded)
        .scan(&candidates, &thresholds, None)
        .unwrap();

    assert_eq!(before.outcomes, after.outcomes);
    assert!(after
        .outcomes
        .iter()
        .all(|o| !matches!(o, PairOutcome::Failed { .. })));
}
