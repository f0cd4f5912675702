//! Deribit JSON-RPC envelope handling
//!
//! Both transports receive the same envelope:
//! `{"jsonrpc": "2.0", "id": 7, "result": {...}}` on success, or
//! `{"jsonrpc": "2.0", "id": 7, "error": {"code": 10000, "message": "..."}}`.
//! The functions here are stateless so HTTP and WebSocket share one code path.

use serde_json::{json, Value};

use crate::fetcher::deribit_config::ORDER_BOOK_METHOD;
use crate::fetcher::{FetcherError, FetcherResult};
use crate::{InstrumentId, OrderBook};

/// Stateless parser for Deribit JSON-RPC envelopes
pub struct JsonRpcParser;

impl JsonRpcParser {
    /// Build a `public/get_order_book` request tagged with `request_id`
    pub fn order_book_request(request_id: u64, instrument: &InstrumentId) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": ORDER_BOOK_METHOD,
            "params": {
                "instrument_name": instrument.as_str(),
            }
        })
        .to_string()
    }

    /// Parse a raw response body into an envelope
    pub fn parse_envelope(body: &str) -> FetcherResult<Value> {
        serde_json::from_str(body)
            .map_err(|e| FetcherError::ParseError(format!("Invalid JSON-RPC response: {e}")))
    }

    /// Extract the `result` member, turning an `error` member into [`FetcherError::ApiError`]
    ///
    /// When `expected_id` is given the envelope's `id` must match it.
    pub fn into_result(mut envelope: Value, expected_id: Option<u64>) -> FetcherResult<OrderBook> {
        if let Some(expected) = expected_id {
            let actual = envelope.get("id").and_then(Value::as_u64);
            if actual != Some(expected) {
                return Err(FetcherError::ProtocolError(format!(
                    "response id {actual:?} does not match request id {expected}"
                )));
            }
        }

        if let Some(error) = envelope.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(FetcherError::ApiError(format!("{code}: {message}")));
        }

        envelope
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| FetcherError::ParseError("Response has no result member".to_string()))
    }

    /// Read the index price for `asset` out of a `public/get_index` result
    ///
    /// Deribit keys the price by currency (`{"BTC": 47000.1, "edp": 47000.1}`);
    /// the estimated delivery price `edp` is used when the currency key is absent.
    pub fn parse_index_price(result: &Value, asset: &str) -> FetcherResult<f64> {
        let price = result
            .get(asset)
            .or_else(|| result.get("edp"))
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                FetcherError::ParseError(format!("No index price for {asset} in response"))
            })?;

        if !price.is_finite() || price <= 0.0 {
            return Err(FetcherError::ParseError(format!(
                "Index price for {asset} must be positive, got {price}"
            )));
        }

        Ok(price)
    }
}
