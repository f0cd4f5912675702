//! Instruments subcommand: print the generated batch

use clap::{Args, ValueEnum};
use tracing::info;

use super::{ChainArgs, CliError, EndpointArgs};
use crate::fetcher::deribit_http::DeribitHttpClient;
use crate::instrument::InstrumentBatch;

/// Output format for the instrument list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// One instrument per line
    Human,
    /// JSON array
    Json,
}

/// Arguments of the `instruments` command
#[derive(Args, Debug)]
pub struct InstrumentsArgs {
    /// Option chain parameters
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Endpoints
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: ListFormat,
}

impl InstrumentsArgs {
    /// Execute the instruments command
    pub fn execute(&self) -> Result<(), CliError> {
        let client =
            DeribitHttpClient::new(self.endpoints.deribit_config(), &self.endpoints.fetch_config())?;
        let batch = self.chain.batch(&client)?;
        info!(instruments = batch.len(), "Batch ready");

        println!("{}", render(&batch, self.format)?);
        Ok(())
    }
}

fn render(batch: &InstrumentBatch, format: ListFormat) -> Result<String, CliError> {
    let rendered = match format {
        ListFormat::Human => batch
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        ListFormat::Json => serde_json::to_string_pretty(batch.ids())?,
    };
    Ok(rendered)
}
