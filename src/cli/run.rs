//! Run subcommand: the full benchmark

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::{ChainArgs, CliError, EndpointArgs};
use crate::fetcher::deribit_http::DeribitHttpClient;
use crate::fetcher::deribit_ws::DeribitWsClient;
use crate::harness::{BenchmarkHarness, BenchmarkReport};
use crate::measure::AllocatorTracer;
use crate::metrics::init_metrics;
use crate::strategy::config::{default_workers, DEFAULT_REPORT_PATH};
use crate::strategy::{CooperativeStrategy, FetchStrategy, ParallelStrategy};

/// Parse and validate the worker count
fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("workers must be at least 1".to_string());
    }
    Ok(value)
}

/// Arguments of the `run` command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Option chain parameters
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Endpoints
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Worker pool size for the parallel strategy
    #[arg(long, default_value_t = default_workers(), value_parser = parse_workers)]
    pub workers: usize,

    /// Report path, overwritten on every run
    #[arg(long, short, default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

impl RunArgs {
    /// Execute the benchmark
    ///
    /// Must be called outside any async runtime: the cooperative strategy
    /// drives its own event loop and the HTTP client blocks.
    pub fn execute(&self) -> Result<(), CliError> {
        if let Some(addr) = self.metrics_addr {
            init_metrics(addr)?;
        }

        let deribit = self.endpoints.deribit_config();
        let fetch_config = self.endpoints.fetch_config();

        let http = DeribitHttpClient::new(deribit.clone(), &fetch_config)?;
        let batch = self.chain.batch(&http)?;

        let cooperative = CooperativeStrategy::new(DeribitWsClient::new(&deribit, &fetch_config));
        let parallel = ParallelStrategy::new(http, self.workers);
        let strategies: [&dyn FetchStrategy; 2] = [&cooperative, &parallel];

        let mut harness = BenchmarkHarness::new(AllocatorTracer::new());
        let report = harness.run_and_report(&batch, &strategies, &self.output)?;

        info!(path = %self.output.display(), "Benchmark complete");
        print_summary(&report);
        Ok(())
    }
}

fn print_summary(report: &BenchmarkReport) {
    println!("{:<40} {:>12} {:>16} {:>10}", "Function", "Seconds", "Memory (bytes)", "Fetched");
    for run in &report.runs {
        println!(
            "{:<40} {:>12.6} {:>16} {:>10}",
            run.record.name,
            run.record.execution_time,
            run.record.memory_usage,
            format!("{}/{}", run.result.len(), run.result.len() + run.result.failures().len()),
        );
    }
}
