//! End-to-end behaviour of the request pipeline with a minimal adapter.

#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use unicex::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves a tiny fictional exchange.
#[derive(Debug, Default)]
struct RelayAdapter {
    market_fetches: AtomicUsize,
}

#[async_trait]
impl ExchangeAdapter for RelayAdapter {
    fn describe(&self) -> ExchangeDescription {
        ExchangeDescription::new("relay", "Relay")
            .url("public", "https://api.relay.invalid/v1")
            .url("private", "https://api.relay.invalid/v1")
            .test_url("public", "https://sandbox.relay.invalid/v1")
            .api("public", HttpMethod::Get, &["markets", "status", "orders/{id}"])
            .exceptions(
                ExceptionTable::new()
                    .exact("E100", ErrorKind::InsufficientFunds)
                    .exact("Order does not exist", ErrorKind::OrderNotFound)
                    .broad("slow down", ErrorKind::RateLimitExceeded),
            )
    }

    fn parse_market(&self, raw: &Value) -> Result<Option<Market>> {
        let (Some(base), Some(quote)) = (safe_string(raw, "base"), safe_string(raw, "quote")) else {
            return Ok(None);
        };
        Ok(Some(Market::spot(format!("{base}{quote}"), base, quote)))
    }

    fn parse_order(&self, raw: &Value, market: Option<&Market>) -> Result<Order> {
        Ok(Order {
            id: safe_string(raw, "id").unwrap_or_default(),
            symbol: market.map(|m| m.symbol.clone()).unwrap_or_default(),
            info: raw.clone(),
            ..Order::default()
        })
    }

    async fn fetch_markets(&self, exchange: &BaseExchange) -> Result<Vec<Market>> {
        self.market_fetches.fetch_add(1, Ordering::SeqCst);
        let response = exchange.fetch("publicGetMarkets", Map::new()).await?;
        let mut markets = Vec::new();
        for raw in response.as_array().into_iter().flatten() {
            if let Some(market) = self.parse_market(raw)? {
                markets.push(market);
            }
        }
        Ok(markets)
    }
}

fn relay(uri: &str) -> (BaseExchange, Arc<RelayAdapter>) {
    let adapter = Arc::new(RelayAdapter::default());
    let config = ExchangeConfig::builder()
        .url_override("public", uri)
        .build();
    let exchange = BaseExchange::new(config, Arc::clone(&adapter) as Arc<dyn ExchangeAdapter>)
        .expect("Failed to create exchange");
    (exchange, adapter)
}

async fn respond(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_rate_limit_carries_retry_hint() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/status",
        ResponseTemplate::new(429).insert_header("Retry-After", "3"),
    )
    .await;
    let (exchange, _) = relay(&server.uri());

    let err = exchange.fetch("publicGetStatus", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert!(err.is(ErrorKind::NetworkError));
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
}

#[tokio::test]
async fn test_challenge_page_on_success_status() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/status",
        ResponseTemplate::new(200)
            .set_body_string("<html><title>Attention Required! | Cloudflare</title></html>"),
    )
    .await;
    let (exchange, _) = relay(&server.uri());

    let err = exchange.fetch("publicGetStatus", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DDoSProtection);
}

#[tokio::test]
async fn test_exact_code_beats_status() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/status",
        ResponseTemplate::new(400).set_body_json(json!({"code": "E100", "msg": "not enough"})),
    )
    .await;
    let (exchange, _) = relay(&server.uri());

    let err = exchange.fetch("publicGetStatus", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(err.code(), Some("E100"));
    assert_eq!(err.data().and_then(|d| d.get("msg")), Some(&json!("not enough")));
}

#[tokio::test]
async fn test_broad_message_on_success_status() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/status",
        ResponseTemplate::new(200).set_body_json(json!({"error": {"message": "please slow down"}})),
    )
    .await;
    let (exchange, _) = relay(&server.uri());

    let err = exchange.fetch("publicGetStatus", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
}

#[tokio::test]
async fn test_unmatched_server_error_uses_status_table() {
    let server = MockServer::start().await;
    respond(&server, "/status", ResponseTemplate::new(503).set_body_string("upstream busy")).await;
    let (exchange, _) = relay(&server.uri());

    let err = exchange.fetch("publicGetStatus", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExchangeNotAvailable);
}

#[tokio::test]
async fn test_success_returns_decoded_body() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/status",
        ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "serverTime": 1})),
    )
    .await;
    let (exchange, _) = relay(&server.uri());

    let body = exchange.fetch("publicGetStatus", Map::new()).await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_path_parameters_are_substituted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/77"))
        .and(query_param("verbose", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "77"})))
        .expect(1)
        .mount(&server)
        .await;
    let (exchange, _) = relay(&server.uri());

    let mut params = Map::new();
    params.insert("id".to_string(), json!(77));
    params.insert("verbose".to_string(), json!(true));
    let body = exchange.fetch("publicGetOrdersId", params).await.unwrap();
    assert_eq!(body["id"], "77");

    let err = exchange.fetch("publicGetOrdersId", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentsRequired);
}

#[tokio::test]
async fn test_unknown_endpoint_name() {
    let (exchange, _) = relay("http://127.0.0.1:9");
    let err = exchange.fetch("publicGetNothing", Map::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InternalError);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // nothing listens on the discard port
    let (exchange, _) = relay("http://127.0.0.1:9");
    let err = exchange.fetch("publicGetStatus", Map::new()).await.unwrap_err();
    assert!(err.is(ErrorKind::NetworkError));
    assert!(err.code().is_none());
}

#[tokio::test]
async fn test_sandbox_without_test_url_is_not_supported() {
    let config = ExchangeConfig::builder().sandbox(true).build();
    let exchange = BaseExchange::new(config, Arc::new(RelayAdapter::default())).unwrap();

    let err = exchange
        .request("orders", "private", HttpMethod::Post, Map::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSupported);
}

#[tokio::test]
async fn test_concurrent_load_markets_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_json(json!([
                    {"base": "BTC", "quote": "USDT"},
                    {"base": "ETH", "quote": "USDT"},
                    {"status": "delisted"}
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (exchange, adapter) = relay(&server.uri());
    let exchange = Arc::new(exchange);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let exchange = Arc::clone(&exchange);
            tokio::spawn(async move { exchange.load_markets().await.map(|m| m.len()) })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 2);
    }
    assert_eq!(adapter.market_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(exchange.market("ETH/USDT").await.unwrap().id, "ETHUSDT");
}

#[tokio::test]
async fn test_failed_load_can_be_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"base": "BTC", "quote": "USDT"}])))
        .mount(&server)
        .await;

    let (exchange, _) = relay(&server.uri());
    assert!(exchange.load_markets().await.is_err());
    assert!(!exchange.markets_loaded().await);
    assert_eq!(exchange.load_markets().await.unwrap().len(), 1);
}
