//! Benchmark metrics
//!
//! Per-request and per-run metrics are recorded through the `metrics` facade.
//! Nothing is exported unless [`init_metrics`] installs the Prometheus
//! exporter; without it the macros are no-ops.
//!
//! ## Metrics
//!
//! - `orderbook_requests_total{strategy, outcome}`
//! - `orderbook_request_duration_seconds{strategy}`
//! - `strategy_runs_total{strategy, outcome}`
//! - `strategy_execution_seconds{strategy}`
//! - `strategy_memory_bytes{strategy}`

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{debug, info};

static METRICS_INITIALIZED: OnceCell<SocketAddr> = OnceCell::new();

/// Metrics setup errors
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Exporter could not be installed
    #[error("failed to install Prometheus exporter: {0}")]
    Install(String),
}

/// Install the Prometheus exporter on `addr`
///
/// Idempotent: later calls are ignored once an exporter is installed.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    if let Some(existing) = METRICS_INITIALIZED.get() {
        debug!("Metrics already initialized on {}, skipping", existing);
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_counter!(
        "orderbook_requests_total",
        Unit::Count,
        "Order book requests issued, by strategy and outcome"
    );

    describe_histogram!(
        "orderbook_request_duration_seconds",
        Unit::Seconds,
        "Order book request round-trip time"
    );

    describe_counter!(
        "strategy_runs_total",
        Unit::Count,
        "Fetch strategy invocations, by outcome"
    );

    describe_gauge!(
        "strategy_execution_seconds",
        Unit::Seconds,
        "Wall-clock time of the last strategy run"
    );

    describe_gauge!(
        "strategy_memory_bytes",
        Unit::Bytes,
        "Live heap bytes at the end of the last strategy run"
    );

    let _ = METRICS_INITIALIZED.set(addr);
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Timer for a single order book request
pub struct RequestMetrics {
    strategy: &'static str,
    start_time: Instant,
}

impl RequestMetrics {
    /// Start timing a request issued by `strategy`
    pub fn start(strategy: &'static str) -> Self {
        Self {
            strategy,
            start_time: Instant::now(),
        }
    }

    /// Record the request outcome
    pub fn record(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };

        counter!(
            "orderbook_requests_total",
            "strategy" => self.strategy,
            "outcome" => outcome,
        )
        .increment(1);

        histogram!(
            "orderbook_request_duration_seconds",
            "strategy" => self.strategy,
        )
        .record(self.start_time.elapsed().as_secs_f64());
    }
}

/// Record a finished strategy run
pub fn record_strategy_run(strategy: &str, success: bool, execution_secs: f64, memory_bytes: u64) {
    let outcome = if success { "success" } else { "failure" };

    counter!(
        "strategy_runs_total",
        "strategy" => strategy.to_string(),
        "outcome" => outcome,
    )
    .increment(1);

    if success {
        gauge!("strategy_execution_seconds", "strategy" => strategy.to_string()).set(execution_secs);
        gauge!("strategy_memory_bytes", "strategy" => strategy.to_string()).set(memory_bytes as f64);
    }
}
