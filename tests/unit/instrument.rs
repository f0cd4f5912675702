//! Batch generation through the public API

use std::collections::HashMap;

use options_fetch_bench::fetcher::{FetcherError, FetcherResult, IndexPriceSource};
use options_fetch_bench::instrument::{
    build_batch, generate, Expiry, GenerateError, InstrumentTemplate, StrikeLadder,
};

struct StaticIndex(f64);

impl IndexPriceSource for StaticIndex {
    fn index_price(&self, _asset: &str) -> FetcherResult<f64> {
        Ok(self.0)
    }
}

struct DownIndex;

impl IndexPriceSource for DownIndex {
    fn index_price(&self, _asset: &str) -> FetcherResult<f64> {
        Err(FetcherError::NetworkError("connection refused".to_string()))
    }
}

fn btc_template() -> InstrumentTemplate {
    InstrumentTemplate::parse("BTC-{0}-{1}-{2}").unwrap()
}

#[test]
fn test_reference_scenario() {
    let expiry = Expiry::parse("31JAN25").unwrap();
    let batch = generate(&StaticIndex(47000.0), &btc_template(), "BTC", &expiry, 5000).unwrap();

    let names: Vec<&str> = batch.iter().map(|id| id.as_str()).collect();
    let mut expected: Vec<String> = Vec::new();
    for flag in ["C", "P"] {
        for strike in (25000..=70000).step_by(5000) {
            expected.push(format!("BTC-31JAN25-{strike}-{flag}"));
        }
    }
    assert_eq!(names, expected);
}

#[test]
fn test_each_strike_appears_twice() {
    let expiry = Expiry::parse("7FEB25").unwrap();
    let (ladder, batch) = build_batch(&btc_template(), &expiry, 101_234.0, 1000).unwrap();

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for id in &batch {
        let strike: i64 = id.as_str().split('-').nth(2).unwrap().parse().unwrap();
        *counts.entry(strike).or_default() += 1;
    }

    assert_eq!(batch.len(), 20);
    assert_eq!(counts.len(), 10);
    assert!(counts.values().all(|&c| c == 2));
    assert_eq!(ladder.center(), 102_000);
}

#[test]
fn test_center_is_smallest_multiple_at_or_above_price() {
    for (price, interval, center) in [
        (47000.0, 5000, 50000),
        (50000.0, 5000, 50000),
        (50000.01, 5000, 55000),
        (3.2, 1, 4),
        (2499.5, 50, 2500),
    ] {
        let ladder = StrikeLadder::around(price, interval).unwrap();
        assert_eq!(ladder.center(), center, "price {price} interval {interval}");
        assert_eq!(ladder.strikes().len(), 10);
        assert_eq!(ladder.strikes()[5], center);
    }
}

#[test]
fn test_non_positive_interval_skips_lookup() {
    let expiry = Expiry::parse("31JAN25").unwrap();
    let err = generate(&DownIndex, &btc_template(), "BTC", &expiry, 0).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParameter(_)));
}

#[test]
fn test_lookup_failure_is_reported() {
    let expiry = Expiry::parse("31JAN25").unwrap();
    let err = generate(&DownIndex, &btc_template(), "BTC", &expiry, 5000).unwrap_err();
    assert!(matches!(err, GenerateError::Lookup(FetcherError::NetworkError(_))));
}

#[test]
fn test_template_and_expiry_validation() {
    assert!(InstrumentTemplate::parse("BTC-{0}-{1}").is_err());
    assert!(InstrumentTemplate::parse("ETH-{0}-{1}-{2}").is_ok());
    assert!(Expiry::parse("31XYZ25").is_err());
    assert!(Expiry::parse("30FEB25").is_err());
    assert!(Expiry::parse("").is_err());
}
