//! Deribit WebSocket JSON-RPC client
//!
//! Each [`OrderBookSource::order_book`] call opens its own connection, sends one
//! `public/get_order_book` request and waits for the matching response. The
//! call never blocks the thread; all waiting happens at await points so many
//! calls can be multiplexed on a single-threaded event loop.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

use crate::fetcher::jsonrpc::JsonRpcParser;
use crate::fetcher::{DeribitConfig, FetchConfig, FetcherError, FetcherResult, OrderBookSource};
use crate::{InstrumentId, OrderBook};

/// WebSocket JSON-RPC client for Deribit public methods
pub struct DeribitWsClient {
    url: String,
    request_timeout: Option<Duration>,
    next_request_id: AtomicU64,
}

impl DeribitWsClient {
    /// Create a client for `config`
    pub fn new(config: &DeribitConfig, fetch_config: &FetchConfig) -> Self {
        Self {
            url: config.ws_url.clone(),
            request_timeout: fetch_config.request_timeout,
            next_request_id: AtomicU64::new(1),
        }
    }

    /// WebSocket URL in use
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Allocate a request id unique within this client
    fn request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Connect, send one request, read until its response arrives
    async fn round_trip(&self, request_id: u64, instrument: &InstrumentId) -> FetcherResult<OrderBook> {
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FetcherError::WebSocketError(format!("connect failed: {e}")))?;
        let (mut write, mut read) = ws_stream.split();

        let request = JsonRpcParser::order_book_request(request_id, instrument);
        write
            .send(Message::Text(request))
            .await
            .map_err(|e| FetcherError::WebSocketError(format!("send failed: {e}")))?;

        debug!(instrument = %instrument, request_id, "Order book request sent");

        while let Some(msg_result) = read.next().await {
            let msg = msg_result
                .map_err(|e| FetcherError::WebSocketError(format!("receive failed: {e}")))?;

            let body = match msg {
                Message::Text(text) => text,
                Message::Binary(data) => String::from_utf8(data).map_err(|e| {
                    FetcherError::ParseError(format!("Binary frame is not UTF-8: {e}"))
                })?,
                Message::Ping(payload) => {
                    write.send(Message::Pong(payload)).await.map_err(|e| {
                        FetcherError::WebSocketError(format!("pong failed: {e}"))
                    })?;
                    continue;
                }
                Message::Close(_) => {
                    return Err(FetcherError::WebSocketError(
                        "connection closed before response".to_string(),
                    ));
                }
                _ => continue,
            };

            let envelope = JsonRpcParser::parse_envelope(&body)?;
            let result = JsonRpcParser::into_result(envelope, Some(request_id));

            // Best effort; the response is already in hand
            let _ = write.send(Message::Close(None)).await;
            return result;
        }

        Err(FetcherError::WebSocketError(
            "stream ended before response".to_string(),
        ))
    }
}

#[async_trait]
impl OrderBookSource for DeribitWsClient {
    async fn order_book(&self, instrument: &InstrumentId) -> FetcherResult<OrderBook> {
        let request_id = self.request_id();

        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.round_trip(request_id, instrument))
                .await
                .map_err(|_| {
                    FetcherError::NetworkError(format!(
                        "no response for {instrument} within {limit:?}"
                    ))
                })?,
            None => self.round_trip(request_id, instrument).await,
        }
    }
}
