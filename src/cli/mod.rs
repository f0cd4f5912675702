//! CLI command implementations

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::fetcher::{DeribitConfig, FetchConfig, IndexPriceSource};
use crate::instrument::{build_batch, generate, Expiry, InstrumentBatch, InstrumentTemplate};
use crate::strategy::config::{
    DEFAULT_ASSET, DEFAULT_EXPIRY, DEFAULT_STRIKE_INTERVAL, DEFAULT_TEMPLATE,
};

pub mod error;
pub mod instruments;
pub mod run;

pub use error::CliError;
pub use instruments::InstrumentsArgs;
pub use run::RunArgs;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Order book fetch benchmark
#[derive(Parser, Debug)]
#[command(name = "options-fetch-bench")]
#[command(about = "Compare cooperative and parallel order book fetching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Log format
    #[arg(long, global = true, env = "LOG_FORMAT", ignore_case = true, default_value = "text")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the batch, benchmark both strategies and write the report
    Run(RunArgs),

    /// Generate the batch and print it
    Instruments(InstrumentsArgs),
}

/// Parameters of the generated option chain
#[derive(Args, Debug, Clone)]
pub struct ChainArgs {
    /// Underlying asset whose index price centers the strike ladder
    #[arg(long, default_value = DEFAULT_ASSET)]
    pub asset: String,

    /// Expiry token (e.g. 31JAN25)
    #[arg(long, default_value = DEFAULT_EXPIRY)]
    pub expiry: String,

    /// Spacing between strikes
    #[arg(long, default_value_t = DEFAULT_STRIKE_INTERVAL, allow_hyphen_values = true)]
    pub strike_interval: i64,

    /// Instrument template: {0} expiry, {1} strike, {2} C/P
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// Use this price instead of looking up the index
    #[arg(long)]
    pub reference_price: Option<f64>,
}

impl ChainArgs {
    /// Build the batch, looking up the index price through `source` unless a
    /// reference price was given
    pub fn batch<S: IndexPriceSource + ?Sized>(&self, source: &S) -> Result<InstrumentBatch, CliError> {
        let template = InstrumentTemplate::parse(&self.template)?;
        let expiry = Expiry::parse(&self.expiry)?;

        let batch = match self.reference_price {
            Some(price) => build_batch(&template, &expiry, price, self.strike_interval)?.1,
            None => generate(source, &template, &self.asset, &expiry, self.strike_interval)?,
        };
        Ok(batch)
    }
}

/// Endpoint and transport options
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Base URL of the HTTP API
    #[arg(long, env = "DERIBIT_HTTP_URL", default_value = "https://www.deribit.com")]
    pub http_url: String,

    /// WebSocket JSON-RPC URL
    #[arg(long, env = "DERIBIT_WS_URL", default_value = "wss://www.deribit.com/ws/api/v2")]
    pub ws_url: String,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: Option<u64>,
}

impl EndpointArgs {
    /// Endpoint configuration
    pub fn deribit_config(&self) -> DeribitConfig {
        DeribitConfig::new(self.http_url.as_str(), self.ws_url.as_str())
    }

    /// Client options
    pub fn fetch_config(&self) -> FetchConfig {
        match self.request_timeout_secs {
            Some(secs) => FetchConfig::default().with_request_timeout(Duration::from_secs(secs)),
            None => FetchConfig::default(),
        }
    }
}
