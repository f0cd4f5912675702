//! Deribit transports
//!
//! Two transports reach the same order-book data:
//! - [`deribit_http::DeribitHttpClient`] - blocking HTTP, one stateless GET per instrument
//! - [`deribit_ws::DeribitWsClient`] - WebSocket JSON-RPC, one connection per instrument
//!
//! Strategies only see the traits defined here, so tests can substitute
//! in-memory sources for either transport.

use crate::{InstrumentId, OrderBook};
use async_trait::async_trait;
use std::time::Duration;

pub mod client;
pub mod deribit_config;
pub mod deribit_http;
pub mod deribit_ws;
pub mod jsonrpc;

pub use deribit_config::DeribitConfig;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response parse error
    #[error("parse error: {0}")]
    ParseError(String),

    /// API error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Network error
    #[error("network error: {0}")]
    NetworkError(String),

    /// WebSocket transport error
    #[error("websocket error: {0}")]
    WebSocketError(String),

    /// Response does not belong to the request that was sent
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Client options shared by both transports
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl FetchConfig {
    /// Apply a per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Source of the reference index price used to center the strike ladder
pub trait IndexPriceSource {
    /// Current index price for `asset` (e.g. "BTC")
    fn index_price(&self, asset: &str) -> FetcherResult<f64>;
}

/// Non-blocking order-book source driven by an event loop
#[async_trait]
pub trait OrderBookSource: Send + Sync {
    /// Fetch one order book
    async fn order_book(&self, instrument: &InstrumentId) -> FetcherResult<OrderBook>;
}

/// Blocking order-book source, one call per worker
pub trait BlockingOrderBookSource: Send + Sync {
    /// Fetch one order book, blocking the calling thread
    fn order_book(&self, instrument: &InstrumentId) -> FetcherResult<OrderBook>;
}
