//! Deribit transports against the local mock server

use std::time::Duration;

use options_fetch_bench::fetcher::deribit_http::DeribitHttpClient;
use options_fetch_bench::fetcher::deribit_ws::DeribitWsClient;
use options_fetch_bench::fetcher::{
    BlockingOrderBookSource, FetchConfig, FetcherError, IndexPriceSource, OrderBookSource,
};
use options_fetch_bench::instrument::{build_batch, generate, Expiry, InstrumentBatch, InstrumentTemplate};

use crate::common::{MockDeribit, MockOptions};

const CALL_50000: &str = "BTC-31JAN25-50000-C";

/// Batch around 47000 at 5000 spacing (strikes 25000..=70000)
fn batch() -> InstrumentBatch {
    let template = InstrumentTemplate::parse("BTC-{0}-{1}-{2}").unwrap();
    let expiry = Expiry::parse("31JAN25").unwrap();
    build_batch(&template, &expiry, 47000.0, 5000).unwrap().1
}

fn find(batch: &InstrumentBatch, name: &str) -> options_fetch_bench::InstrumentId {
    batch
        .iter()
        .find(|id| id.as_str() == name)
        .cloned()
        .expect("instrument in batch")
}

#[test]
fn test_http_index_price() {
    let server = MockDeribit::with_options(MockOptions {
        index_price: 61234.5,
        ..MockOptions::default()
    });
    let client = DeribitHttpClient::new(server.config(), &FetchConfig::default()).unwrap();

    assert_eq!(client.index_price("btc").unwrap(), 61234.5);
}

#[test]
fn test_generate_against_live_index() {
    let server = MockDeribit::start();
    let client = DeribitHttpClient::new(server.config(), &FetchConfig::default()).unwrap();
    let template = InstrumentTemplate::parse("BTC-{0}-{1}-{2}").unwrap();
    let expiry = Expiry::parse("31JAN25").unwrap();

    let batch = generate(&client, &template, "BTC", &expiry, 5000).unwrap();

    assert_eq!(batch.len(), 20);
    assert_eq!(batch.ids()[0].as_str(), "BTC-31JAN25-25000-C");
    assert_eq!(batch.ids()[19].as_str(), "BTC-31JAN25-70000-P");
}

#[test]
fn test_http_order_book() {
    let server = MockDeribit::start();
    let client = DeribitHttpClient::new(server.config(), &FetchConfig::default()).unwrap();

    let book = client.order_book(&find(&batch(), CALL_50000)).unwrap();

    assert_eq!(book["instrument_name"], CALL_50000);
    assert_eq!(server.http_requests(), 1);
}

#[test]
fn test_http_error_status_is_failure() {
    let server = MockDeribit::with_options(MockOptions::default().failing(&[CALL_50000]));
    let client = DeribitHttpClient::new(server.config(), &FetchConfig::default()).unwrap();

    let err = client.order_book(&find(&batch(), CALL_50000)).unwrap_err();

    assert!(matches!(err, FetcherError::HttpError(_)), "got {err:?}");
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_ws_order_book() {
    let server = MockDeribit::start();
    let client = DeribitWsClient::new(&server.config(), &FetchConfig::default());

    let book = client.order_book(&find(&batch(), CALL_50000)).await.unwrap();

    assert_eq!(book["instrument_name"], CALL_50000);
    assert_eq!(book["state"], "open");
}

#[tokio::test]
async fn test_ws_api_error_is_failure() {
    let server = MockDeribit::with_options(MockOptions::default().failing(&[CALL_50000]));
    let client = DeribitWsClient::new(&server.config(), &FetchConfig::default());

    let err = client.order_book(&find(&batch(), CALL_50000)).await.unwrap_err();

    assert!(matches!(err, FetcherError::ApiError(_)), "got {err:?}");
    assert!(err.to_string().contains("10009"));
}

#[tokio::test]
async fn test_ws_answers_ping_before_response() {
    let server = MockDeribit::with_options(MockOptions {
        ping_first: true,
        ..MockOptions::default()
    });
    let client = DeribitWsClient::new(&server.config(), &FetchConfig::default());

    let book = client.order_book(&find(&batch(), CALL_50000)).await.unwrap();
    assert_eq!(book["instrument_name"], CALL_50000);
}

#[tokio::test]
async fn test_ws_connection_lost_after_ping_is_failure() {
    let server = MockDeribit::with_options(MockOptions {
        ping_first: true,
        hang_up_after_ping: true,
        ..MockOptions::default()
    });
    let client = DeribitWsClient::new(&server.config(), &FetchConfig::default());

    let err = client.order_book(&find(&batch(), CALL_50000)).await.unwrap_err();
    assert!(matches!(err, FetcherError::WebSocketError(_)), "got {err:?}");
}

#[tokio::test]
async fn test_ws_mismatched_id_is_failure() {
    let server = MockDeribit::with_options(MockOptions {
        mismatched_ids: true,
        ..MockOptions::default()
    });
    let client = DeribitWsClient::new(&server.config(), &FetchConfig::default());

    let err = client.order_book(&find(&batch(), CALL_50000)).await.unwrap_err();
    assert!(matches!(err, FetcherError::ProtocolError(_)), "got {err:?}");
}

#[tokio::test]
async fn test_ws_request_timeout() {
    let server = MockDeribit::with_options(MockOptions {
        ws_delay: Duration::from_secs(2),
        ..MockOptions::default()
    });
    let config = FetchConfig::default().with_request_timeout(Duration::from_millis(200));
    let client = DeribitWsClient::new(&server.config(), &config);

    let err = client.order_book(&find(&batch(), CALL_50000)).await.unwrap_err();
    assert!(matches!(err, FetcherError::NetworkError(_)), "got {err:?}");
}
