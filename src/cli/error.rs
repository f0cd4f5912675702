//! CLI error types and conversions

use crate::fetcher::FetcherError;
use crate::harness::HarnessError;
use crate::instrument::GenerateError;
use crate::metrics::MetricsError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Transport setup failed
    #[error("fetcher error: {0}")]
    Fetcher(#[from] FetcherError),

    /// Batch could not be generated
    #[error("generate error: {0}")]
    Generate(#[from] GenerateError),

    /// A strategy failed or the report could not be written
    #[error("benchmark error: {0}")]
    Harness(#[from] HarnessError),

    /// Metrics exporter could not be installed
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// Output could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
