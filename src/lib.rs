//! # Options Fetch Bench
//!
//! Benchmarks two strategies for fetching many independent order books and
//! reports which one is faster and lighter on memory.
//!
//! ## Features
//!
//! - **Option Chain Generation**: builds a strike ladder around the live index price
//!   and renders one instrument name per (expiry, strike, call/put) tuple
//! - **Cooperative Strategy**: every request in flight at once on a single-threaded
//!   event loop over WebSocket, fail-fast join
//! - **Parallel Strategy**: blocking HTTP requests spread over a fixed worker pool,
//!   per-instrument failure isolation
//! - **Measurement**: wall-clock time and live heap bytes around any operation,
//!   through an explicit allocation tracer handle
//! - **Reporting**: flat CSV report, rebuilt on every run
//!
//! ## Quick Start
//!
//! ```no_run
//! use options_fetch_bench::fetcher::deribit_http::DeribitHttpClient;
//! use options_fetch_bench::fetcher::{DeribitConfig, FetchConfig};
//! use options_fetch_bench::instrument::{generate, Expiry, InstrumentTemplate};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DeribitHttpClient::new(DeribitConfig::production(), &FetchConfig::default())?;
//! let template = InstrumentTemplate::parse("BTC-{0}-{1}-{2}")?;
//! let expiry = Expiry::parse("31JAN25")?;
//!
//! let batch = generate(&client, &template, "BTC", &expiry, 5000)?;
//! assert_eq!(batch.len(), 20);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`instrument`] - Expiry/template parsing and the strike ladder generator
//! - [`fetcher`] - Deribit transports (blocking HTTP, WebSocket JSON-RPC)
//! - [`strategy`] - Cooperative and parallel fetch strategies
//! - [`measure`] - Measurement wrapper and allocation tracer
//! - [`harness`] - Runs strategies sequentially and collects records
//! - [`output`] - CSV report writer

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// CLI command implementations
pub mod cli;

/// Deribit transports
pub mod fetcher;

/// Benchmark orchestration
pub mod harness;

/// Option chain generation
pub mod instrument;

/// Measurement wrapper and allocation tracking
pub mod measure;

/// Metrics collection
pub mod metrics;

/// Report writers
pub mod output;

/// Fetch strategies
pub mod strategy;

pub use harness::BenchmarkHarness;
pub use instrument::{InstrumentBatch, InstrumentTemplate};
pub use measure::{measure, try_measure, AllocationTracer, Measured};
pub use output::MeasurementRecord;

/// Opaque order-book payload; the schema belongs to the upstream service.
pub type OrderBook = serde_json::Value;

/// Option type flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionKind {
    /// Call option
    #[serde(rename = "C")]
    Call,
    /// Put option
    #[serde(rename = "P")]
    Put,
}

impl OptionKind {
    /// Both kinds, calls first
    pub const ALL: [OptionKind; 2] = [OptionKind::Call, OptionKind::Put];

    /// One-character flag used in instrument names
    pub fn flag(&self) -> char {
        match self {
            OptionKind::Call => 'C',
            OptionKind::Put => 'P',
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// Instrument name of a single option contract (e.g. `BTC-31JAN25-50000-C`)
///
/// Only the generator in [`instrument`] renders these; everything else treats
/// the name as an opaque key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub(crate) fn new(name: String) -> Self {
        Self(name)
    }

    /// Instrument name as sent to the exchange
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InstrumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
