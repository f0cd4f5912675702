//! Blocking Deribit HTTP client
//!
//! Serves the index price lookup used by the generator and the stateless
//! order-book GET used by the parallel strategy. Every call is a single
//! attempt: failures are returned to the caller, never retried.

use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::fetcher::client::build_blocking_client;
use crate::fetcher::jsonrpc::JsonRpcParser;
use crate::fetcher::{
    BlockingOrderBookSource, DeribitConfig, FetchConfig, FetcherError, FetcherResult,
    IndexPriceSource,
};
use crate::{InstrumentId, OrderBook};

/// Blocking HTTP client for Deribit public endpoints
#[derive(Clone)]
pub struct DeribitHttpClient {
    client: Client,
    config: DeribitConfig,
}

impl DeribitHttpClient {
    /// Create a client for `config`
    ///
    /// # Errors
    /// Returns `FetcherError::HttpError` if the underlying client cannot be built
    pub fn new(config: DeribitConfig, fetch_config: &FetchConfig) -> FetcherResult<Self> {
        let client = build_blocking_client(fetch_config)?;
        Ok(Self { client, config })
    }

    /// Endpoint configuration in use
    pub fn config(&self) -> &DeribitConfig {
        &self.config
    }

    /// Execute a GET request and return the JSON-RPC `result` member
    fn get(&self, url: &str, params: &[(&str, &str)]) -> FetcherResult<Value> {
        debug!("Making GET request to: {} with {} params", url, params.len());

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;

        let body = Self::check_status(response)?;
        let envelope = JsonRpcParser::parse_envelope(&body)?;
        JsonRpcParser::into_result(envelope, None)
    }

    /// Turn non-2xx responses into errors, returning the body otherwise
    fn check_status(response: Response) -> FetcherResult<String> {
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetcherError::HttpError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .text()
            .map_err(|e| FetcherError::NetworkError(format!("Failed to read body: {e}")))
    }
}

impl IndexPriceSource for DeribitHttpClient {
    fn index_price(&self, asset: &str) -> FetcherResult<f64> {
        let currency = asset.to_uppercase();
        let result = self.get(&self.config.index_url(), &[("currency", &currency)])?;
        let price = JsonRpcParser::parse_index_price(&result, &currency)?;
        debug!(asset = %currency, price, "Index price fetched");
        Ok(price)
    }
}

impl BlockingOrderBookSource for DeribitHttpClient {
    fn order_book(&self, instrument: &InstrumentId) -> FetcherResult<OrderBook> {
        self.get(
            &self.config.order_book_url(),
            &[("instrument_name", instrument.as_str())],
        )
    }
}
