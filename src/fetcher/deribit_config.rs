//! Deribit endpoint configuration
//!
//! Keeps every URL in one place so the transports can be pointed at a local
//! server in tests.
//!
//! - **HTTP**: <https://www.deribit.com> with `/api/v2/public/*` endpoints
//! - **WebSocket**: <wss://www.deribit.com/ws/api/v2>

/// Index price endpoint path
pub const INDEX_ENDPOINT: &str = "/api/v2/public/get_index";

/// Order book endpoint path
pub const ORDER_BOOK_ENDPOINT: &str = "/api/v2/public/get_order_book";

/// JSON-RPC method name for order book requests over WebSocket
pub const ORDER_BOOK_METHOD: &str = "public/get_order_book";

/// Configuration for a Deribit deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeribitConfig {
    /// Base URL for HTTP endpoints (no trailing slash)
    pub http_base_url: String,

    /// WebSocket JSON-RPC URL
    pub ws_url: String,
}

impl DeribitConfig {
    /// Public production endpoints
    pub fn production() -> Self {
        Self::new("https://www.deribit.com", "wss://www.deribit.com/ws/api/v2")
    }

    /// Custom endpoints; a trailing slash on the HTTP base is dropped
    pub fn new(http_base_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        let http_base_url = http_base_url.into().trim_end_matches('/').to_string();
        Self {
            http_base_url,
            ws_url: ws_url.into(),
        }
    }

    /// Full URL of the index endpoint
    pub fn index_url(&self) -> String {
        format!("{}{}", self.http_base_url, INDEX_ENDPOINT)
    }

    /// Full URL of the order book endpoint
    pub fn order_book_url(&self) -> String {
        format!("{}{}", self.http_base_url, ORDER_BOOK_ENDPOINT)
    }
}

impl Default for DeribitConfig {
    fn default() -> Self {
        Self::production()
    }
}
