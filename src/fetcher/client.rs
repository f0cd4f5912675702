//! HTTP client construction
//!
//! Every transport builds its client through here so that timeout settings
//! come from a single [`FetchConfig`]. Clients are owned by the transport that
//! built them; nothing is cached process-wide.

use reqwest::blocking::Client;

use crate::fetcher::{FetchConfig, FetcherError, FetcherResult};

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = concat!("options-fetch-bench/", env!("CARGO_PKG_VERSION"));

/// Build a blocking HTTP client honouring `config`
///
/// The returned client keeps its own connection pool; cloning it is cheap and
/// shares that pool across worker threads.
pub fn build_blocking_client(config: &FetchConfig) -> FetcherResult<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    // reqwest's blocking client defaults to a 30s timeout; keep "no timeout"
    // unless one was asked for.
    builder = builder.timeout(config.request_timeout);

    builder
        .build()
        .map_err(|e| FetcherError::HttpError(format!("Failed to build HTTP client: {e}")))
}
