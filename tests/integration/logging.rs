//! Logging and tracing setup

use options_fetch_bench::cli::{Cli, LogFormat};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[test]
fn test_tracing_subscriber_initialization() {
    // try_init: another test may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("options_fetch_bench=debug")),
        )
        .with_test_writer()
        .try_init();

    info!(strategy = "cooperative", instruments = 20, "Running strategy");
    warn!(instrument = "BTC-31JAN25-50000-C", error = "HTTP 400", "Error fetching order book");
    error!(strategy = "cooperative", "Strategy failed");
}

#[test]
fn test_tracing_json_format() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("options_fetch_bench=info"))
        .with_test_writer()
        .try_init();

    info!(seconds = 0.25, memory_bytes = 4096_u64, "Strategy finished");
}

#[test]
fn test_env_filter_directives_parse() {
    for directive in [
        "info",
        "options_fetch_bench=debug",
        "warn,options_fetch_bench=trace",
        "options_fetch_bench::strategy=debug",
    ] {
        assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
    }
}

#[test]
fn test_log_format_flag() {
    let cli = Cli::try_parse_from(["options-fetch-bench", "--log-format", "json", "instruments"])
        .unwrap();
    assert_eq!(cli.log_format, LogFormat::Json);

    let cli = Cli::try_parse_from(["options-fetch-bench", "instruments", "--log-format", "JSON"])
        .unwrap();
    assert_eq!(cli.log_format, LogFormat::Json);
}
