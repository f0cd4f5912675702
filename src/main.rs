//! Entry point for the options-fetch-bench CLI

use clap::Parser;
use options_fetch_bench::cli::{Cli, Commands, LogFormat};
use options_fetch_bench::measure::TrackingAllocator;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator::new();

/// Initialize the tracing subscriber in the requested format
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("options_fetch_bench=info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let result = match &cli.command {
        Commands::Run(args) => args.execute().map_err(|e| anyhow::anyhow!(e)),
        Commands::Instruments(args) => args.execute().map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
