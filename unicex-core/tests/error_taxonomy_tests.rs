//! Error taxonomy and classification tests exercised through the public API.

use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;
use unicex_core::classifier::{ExceptionTable, HttpExceptions, classify};
use unicex_core::error::ErrorKind;
use unicex_core::http_client::HttpResponse;

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: BTreeMap::new(),
        body: body.to_string(),
    }
}

fn decoded(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}

// ============================================================================
// Taxonomy
// ============================================================================

#[test]
fn every_kind_belongs_to_its_ancestors() {
    for kind in ErrorKind::ALL {
        assert!(kind.is_a(kind));
        let mut current = kind;
        while let Some(parent) = current.parent() {
            assert!(kind.is_a(parent), "{kind} should be a {parent}");
            current = parent;
        }
    }
}

#[test]
fn rate_limit_is_a_network_error() {
    assert!(ErrorKind::RateLimitExceeded.is_a(ErrorKind::DDoSProtection));
    assert!(ErrorKind::RateLimitExceeded.is_a(ErrorKind::NetworkError));
    assert!(!ErrorKind::RateLimitExceeded.is_a(ErrorKind::ExchangeError));
    assert!(ErrorKind::OrderNotFound.is_a(ErrorKind::InvalidOrder));
    assert!(ErrorKind::OrderNotFound.is_a(ErrorKind::ExchangeError));
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn exact_code_beats_broad_message() {
    let table = ExceptionTable::new()
        .exact("-2011", ErrorKind::OrderNotFound)
        .broad("Unknown order", ErrorKind::InvalidOrder);
    let body = r#"{"code":-2011,"msg":"Unknown order sent."}"#;
    let err = classify(
        "binance",
        &response(400, body),
        decoded(body).as_ref(),
        &table,
        &HttpExceptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OrderNotFound);
    assert_eq!(err.code(), Some("-2011"));
    let details = err.as_classified().unwrap();
    assert!(details.message.starts_with("binance "));
}

#[test]
fn throttled_response_carries_retry_hint() {
    let mut resp = response(429, "Too many requests");
    resp.headers.insert("retry-after".into(), "3".into());
    let err = classify(
        "okx",
        &resp,
        None,
        &ExceptionTable::new(),
        &HttpExceptions::default(),
    )
    .unwrap_err();
    assert!(err.is(ErrorKind::RateLimitExceeded));
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
}

#[test]
fn cloudflare_page_on_200_is_ddos_protection() {
    let body = "<html><title>Attention Required! | Cloudflare</title></html>";
    let err = classify(
        "binance",
        &response(200, body),
        None,
        &ExceptionTable::new(),
        &HttpExceptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DDoSProtection);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn clean_success_bodies_pass(n in any::<i64>(), text in "[a-z ]{0,16}") {
        let body = json!({"price": n.to_string(), "note": text}).to_string();
        let result = classify(
            "mock",
            &response(200, &body),
            decoded(&body).as_ref(),
            &ExceptionTable::new(),
            &HttpExceptions::default(),
        );
        prop_assert!(result.is_ok());
    }

    #[test]
    fn every_failure_status_is_an_error(status in 400u16..600, body in "[a-z ]{0,16}") {
        let result = classify(
            "mock",
            &response(status, &body),
            None,
            &ExceptionTable::new(),
            &HttpExceptions::default(),
        );
        prop_assert!(result.is_err());
    }
}
