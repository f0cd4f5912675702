//! Full benchmark runs through the harness

use options_fetch_bench::fetcher::deribit_http::DeribitHttpClient;
use options_fetch_bench::fetcher::deribit_ws::DeribitWsClient;
use options_fetch_bench::fetcher::FetchConfig;
use options_fetch_bench::harness::{BenchmarkHarness, HarnessError};
use options_fetch_bench::instrument::{generate, Expiry, InstrumentTemplate};
use options_fetch_bench::measure::{AllocatorTracer, NoopTracer};
use options_fetch_bench::output::csv::REPORT_HEADER;
use options_fetch_bench::strategy::config::{COOPERATIVE_NAME, PARALLEL_NAME};
use options_fetch_bench::strategy::{CooperativeStrategy, FetchStrategy, ParallelStrategy, StrategyError};
use tempfile::TempDir;

use crate::common::{MockDeribit, MockOptions};

fn strategies(
    server: &MockDeribit,
) -> (
    CooperativeStrategy<DeribitWsClient>,
    ParallelStrategy<DeribitHttpClient>,
) {
    let config = FetchConfig::default();
    let cooperative = CooperativeStrategy::new(DeribitWsClient::new(&server.config(), &config));
    let parallel = ParallelStrategy::new(
        DeribitHttpClient::new(server.config(), &config).unwrap(),
        4,
    );
    (cooperative, parallel)
}

fn live_batch(server: &MockDeribit) -> options_fetch_bench::InstrumentBatch {
    let client = DeribitHttpClient::new(server.config(), &FetchConfig::default()).unwrap();
    let template = InstrumentTemplate::parse("BTC-{0}-{1}-{2}").unwrap();
    let expiry = Expiry::parse("31JAN25").unwrap();
    generate(&client, &template, "BTC", &expiry, 5000).unwrap()
}

#[test]
fn test_benchmark_writes_one_row_per_strategy() {
    let server = MockDeribit::start();
    let batch = live_batch(&server);
    let (cooperative, parallel) = strategies(&server);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("execution_results.csv");

    let mut harness = BenchmarkHarness::new(AllocatorTracer::new());
    let report = harness
        .run_and_report(&batch, &[&cooperative as &dyn FetchStrategy, &parallel], &path)
        .unwrap();

    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.run(COOPERATIVE_NAME).unwrap().result.len(), 20);
    assert_eq!(report.run(PARALLEL_NAME).unwrap().result.len(), 20);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], REPORT_HEADER.join(","));
    assert!(lines[1].starts_with(&format!("{COOPERATIVE_NAME},")));
    assert!(lines[2].starts_with(&format!("{PARALLEL_NAME},")));

    for line in &lines[1..] {
        let fields: Vec<&str> = line.rsplitn(3, ',').collect();
        assert!(fields[0].parse::<u64>().is_ok(), "memory column: {}", fields[0]);
        let seconds: f64 = fields[1].parse().unwrap();
        assert!(seconds >= 0.0);
    }
}

#[test]
fn test_cooperative_failure_aborts_before_report() {
    let server =
        MockDeribit::with_options(MockOptions::default().failing(&["BTC-31JAN25-50000-C"]));
    let batch = live_batch(&server);
    let (cooperative, parallel) = strategies(&server);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("execution_results.csv");

    let mut harness = BenchmarkHarness::new(NoopTracer);
    let err = harness
        .run_and_report(&batch, &[&cooperative as &dyn FetchStrategy, &parallel], &path)
        .unwrap_err();

    match err {
        HarnessError::Strategy { name, source } => {
            assert_eq!(name, COOPERATIVE_NAME);
            assert!(matches!(source, StrategyError::BatchFetch(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!path.exists());
    // Parallel never ran
    assert_eq!(server.http_requests(), 0);
}

#[test]
fn test_parallel_failure_still_reports() {
    let server = MockDeribit::with_options(MockOptions::default().failing(&["BTC-31JAN25-70000-P"]));
    let batch = live_batch(&server);
    let (_, parallel) = strategies(&server);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results.csv");

    let mut harness = BenchmarkHarness::new(NoopTracer);
    let report = harness.run_and_report(&batch, &[&parallel], &path).unwrap();

    let run = report.run(PARALLEL_NAME).unwrap();
    assert_eq!(run.result.len(), 19);
    assert_eq!(run.result.failures().len(), 1);
    assert!(path.exists());
}
