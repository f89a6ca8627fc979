//! OKX adapter: description, request signing and response hooks.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use unicex_core::adapter::ExchangeAdapter;
use unicex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign, urlencode};
use unicex_core::classifier::{ExceptionTable, parse_retry_after};
use unicex_core::credentials::RequiredCredentials;
use unicex_core::description::ExchangeDescription;
use unicex_core::error::{ClassifiedError, Error, ErrorKind, Result};
use unicex_core::http_client::HttpResponse;
use unicex_core::parser_utils::safe_string;
use unicex_core::precision::PrecisionMode;
use unicex_core::signed_request::{HttpMethod, PreparedRequest, SignContext, SignRequest, join_url};
use unicex_core::time::iso8601;
use unicex_core::types::{Market, Order, OrderStatus};
use unicex_core::BaseExchange;

use super::parser;

/// V5 error codes.
///
/// Reference: https://www.okx.com/docs-v5/en/#error-code
pub fn exceptions() -> ExceptionTable {
    ExceptionTable::new()
        .exact("50000", ErrorKind::BadRequest)
        .exact("50001", ErrorKind::OnMaintenance)
        .exact("50002", ErrorKind::BadRequest)
        .exact("50004", ErrorKind::RequestTimeout)
        .exact("50005", ErrorKind::ExchangeNotAvailable)
        .exact("50011", ErrorKind::RateLimitExceeded)
        .exact("50013", ErrorKind::ExchangeNotAvailable)
        .exact("50014", ErrorKind::ArgumentsRequired)
        .exact("50102", ErrorKind::InvalidNonce)
        .exact("50103", ErrorKind::AuthenticationError)
        .exact("50105", ErrorKind::AuthenticationError)
        .exact("50111", ErrorKind::AuthenticationError)
        .exact("50113", ErrorKind::AuthenticationError)
        .exact("50114", ErrorKind::AuthenticationError)
        .exact("51000", ErrorKind::BadRequest)
        .exact("51001", ErrorKind::BadSymbol)
        .exact("51008", ErrorKind::InsufficientFunds)
        .exact("51119", ErrorKind::InsufficientFunds)
        .exact("51400", ErrorKind::OrderNotFound)
        .exact("51603", ErrorKind::OrderNotFound)
        .broad("Instrument ID does not exist", ErrorKind::BadSymbol)
        .broad("Insufficient", ErrorKind::InsufficientFunds)
}

/// Plugs OKX into the generic engine.
#[derive(Debug, Clone)]
pub struct OkxAdapter {
    exceptions: ExceptionTable,
}

impl Default for OkxAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl OkxAdapter {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self {
            exceptions: exceptions(),
        }
    }

    fn sign_private(&self, request: &SignRequest, ctx: &SignContext<'_>) -> Result<PreparedRequest> {
        ctx.credentials
            .check_required(ctx.exchange_id, RequiredCredentials::API_KEY_SECRET_PASSWORD)?;

        let timestamp = iso8601(ctx.timestamp).ok_or_else(|| {
            Error::internal(format!("Cannot render timestamp {} as ISO 8601", ctx.timestamp))
        })?;

        let mut url = join_url(ctx.base_url, &request.path);
        let mut headers = request.headers.clone();
        let body = if request.method.uses_query() {
            if !request.params.is_empty() {
                url.push('?');
                url.push_str(&urlencode(&request.params));
            }
            None
        } else {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
            Some(serde_json::to_string(&request.params)?)
        };

        let payload = format!(
            "{timestamp}{}{}{}",
            request.method.as_str(),
            request_path(&url),
            body.as_deref().unwrap_or_default()
        );
        let signature = hmac_sign(
            &payload,
            ctx.credentials.secret()?,
            HashAlgorithm::Sha256,
            DigestFormat::Base64,
        )?;

        headers.insert("OK-ACCESS-KEY".to_string(), ctx.credentials.api_key()?.to_string());
        headers.insert("OK-ACCESS-SIGN".to_string(), signature);
        headers.insert("OK-ACCESS-TIMESTAMP".to_string(), timestamp);
        headers.insert(
            "OK-ACCESS-PASSPHRASE".to_string(),
            ctx.credentials.password()?.to_string(),
        );

        Ok(PreparedRequest {
            url,
            method: request.method,
            headers,
            body,
        })
    }

    fn classified(&self, code: &str, message: &str, response: &HttpResponse, body: &Value) -> Error {
        let kind = self
            .exceptions
            .find_exact(code)
            .or_else(|| self.exceptions.find_broad(message))
            .unwrap_or(ErrorKind::ExchangeError);
        ClassifiedError::new(kind, format!("okx {}", response.body_preview()))
            .with_code(code)
            .with_data(body.clone())
            .with_retry_after(response.header("retry-after").and_then(parse_retry_after))
            .into()
    }
}

/// Path and query of an absolute url, as OKX expects it in the signature.
fn request_path(url: &str) -> &str {
    let host_start = url.find("://").map_or(0, |i| i + 3);
    url[host_start..]
        .find('/')
        .map_or("/", |i| &url[host_start + i..])
}

#[async_trait]
impl ExchangeAdapter for OkxAdapter {
    fn describe(&self) -> ExchangeDescription {
        ExchangeDescription::new("okx", "OKX")
            .version("v5")
            .rate_limit(100)
            .hostname("www.okx.com")
            .url("public", "https://{hostname}/api/v5")
            .url("private", "https://{hostname}/api/v5")
            .test_url("public", "https://{hostname}/api/v5")
            .test_url("private", "https://{hostname}/api/v5")
            .api("public", HttpMethod::Get, &["public/instruments", "public/time", "market/books"])
            .api(
                "private",
                HttpMethod::Get,
                &["trade/order", "trade/orders-pending", "account/balance"],
            )
            .api("private", HttpMethod::Post, &["trade/order", "trade/cancel-order"])
            .exceptions(self.exceptions.clone())
            .precision_mode(PrecisionMode::TickSize)
            .required_credentials(RequiredCredentials::API_KEY_SECRET_PASSWORD)
            .option("tdMode", json!("cash"))
    }

    fn sign(&self, request: &SignRequest, ctx: &SignContext<'_>) -> Result<PreparedRequest> {
        let mut prepared = if request.tier == "private" {
            self.sign_private(request, ctx)?
        } else {
            PreparedRequest::public(request, ctx)?
        };
        if is_demo_trading(ctx.options) {
            prepared
                .headers
                .insert("x-simulated-trading".to_string(), "1".to_string());
        }
        Ok(prepared)
    }

    /// OKX answers most failures with HTTP 200 and a non-zero `code`; order
    /// endpoints report per-item failures as `data[].sCode`.
    fn handle_errors(&self, response: &HttpResponse, decoded: Option<&Value>) -> Option<Error> {
        let body = decoded?;
        let code = safe_string(body, "code")?;

        if let Some(items) = body.get("data").and_then(Value::as_array) {
            for item in items {
                let Some(item_code) = safe_string(item, "sCode") else {
                    continue;
                };
                if item_code != "0" {
                    let message = safe_string(item, "sMsg").unwrap_or_default();
                    return Some(self.classified(&item_code, &message, response, body));
                }
            }
        }

        if code == "0" {
            return None;
        }
        let message = safe_string(body, "msg").unwrap_or_default();
        Some(self.classified(&code, &message, response, body))
    }

    fn parse_market(&self, raw: &Value) -> Result<Option<Market>> {
        parser::parse_market(raw)
    }

    fn parse_order(&self, raw: &Value, market: Option<&Market>) -> Result<Order> {
        parser::parse_order(raw, market)
    }

    fn parse_order_status(&self, status: &str) -> Option<OrderStatus> {
        parser::parse_order_status(status)
    }

    async fn fetch_markets(&self, exchange: &BaseExchange) -> Result<Vec<Market>> {
        let mut params = Map::new();
        params.insert("instType".to_string(), json!("SPOT"));
        let response = exchange.fetch("publicGetPublicInstruments", params).await?;

        let mut markets = Vec::new();
        for raw in parser::data_list(&response)? {
            if let Some(market) = self.parse_market(raw)? {
                markets.push(market);
            }
        }
        Ok(markets)
    }
}

/// Whether an options map turns demo trading on.
pub fn is_demo_trading(options: &Map<String, Value>) -> bool {
    match options.get("demoTrading") {
        Some(Value::Bool(enabled)) => *enabled,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use unicex_core::auth::base64_decode;
    use unicex_core::credentials::{Credentials, SecretString};

    fn credentials() -> Credentials {
        Credentials {
            api_key: Some(SecretString::new("key")),
            secret: Some(SecretString::new("secret")),
            password: Some(SecretString::new("phrase")),
            ..Credentials::default()
        }
    }

    fn response(body: &str) -> (HttpResponse, Value) {
        let response = HttpResponse {
            status: 200,
            headers: BTreeMap::new(),
            body: body.to_string(),
        };
        (response, serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_request_path() {
        assert_eq!(
            request_path("https://www.okx.com/api/v5/account/balance?ccy=BTC"),
            "/api/v5/account/balance?ccy=BTC"
        );
        assert_eq!(request_path("http://127.0.0.1:8080/api/v5/x"), "/api/v5/x");
        assert_eq!(request_path("https://www.okx.com"), "/");
    }

    #[test]
    fn test_sign_private_get() {
        let creds = credentials();
        let options = Map::new();
        let ctx = SignContext {
            exchange_id: "okx",
            base_url: "https://www.okx.com/api/v5",
            credentials: &creds,
            timestamp: 1_609_459_200_000,
            options: &options,
        };
        let request = SignRequest {
            path: "account/balance".into(),
            tier: "private".into(),
            method: HttpMethod::Get,
            params: json!({"ccy": "BTC"}).as_object().cloned().unwrap(),
            ..SignRequest::default()
        };

        let prepared = OkxAdapter::new().sign(&request, &ctx).unwrap();
        assert_eq!(prepared.url, "https://www.okx.com/api/v5/account/balance?ccy=BTC");
        assert_eq!(prepared.headers["OK-ACCESS-TIMESTAMP"], "2021-01-01T00:00:00.000Z");
        assert_eq!(prepared.headers["OK-ACCESS-PASSPHRASE"], "phrase");
        assert_eq!(prepared.headers["OK-ACCESS-KEY"], "key");

        let expected = hmac_sign(
            "2021-01-01T00:00:00.000ZGET/api/v5/account/balance?ccy=BTC",
            "secret",
            HashAlgorithm::Sha256,
            DigestFormat::Base64,
        )
        .unwrap();
        assert_eq!(prepared.headers["OK-ACCESS-SIGN"], expected);
        assert_eq!(base64_decode(&expected).unwrap().len(), 32);
        assert!(!prepared.headers.contains_key("x-simulated-trading"));
    }

    #[test]
    fn test_sign_private_post_signs_body() {
        let creds = credentials();
        let options = json!({"demoTrading": true}).as_object().cloned().unwrap();
        let ctx = SignContext {
            exchange_id: "okx",
            base_url: "https://www.okx.com/api/v5",
            credentials: &creds,
            timestamp: 1_609_459_200_000,
            options: &options,
        };
        let request = SignRequest {
            path: "trade/cancel-order".into(),
            tier: "private".into(),
            method: HttpMethod::Post,
            params: json!({"instId": "BTC-USDT", "ordId": "1"}).as_object().cloned().unwrap(),
            ..SignRequest::default()
        };

        let prepared = OkxAdapter::new().sign(&request, &ctx).unwrap();
        let body = prepared.body.clone().unwrap();
        assert_eq!(body, r#"{"instId":"BTC-USDT","ordId":"1"}"#);
        let expected = hmac_sign(
            &format!("2021-01-01T00:00:00.000ZPOST/api/v5/trade/cancel-order{body}"),
            "secret",
            HashAlgorithm::Sha256,
            DigestFormat::Base64,
        )
        .unwrap();
        assert_eq!(prepared.headers["OK-ACCESS-SIGN"], expected);
        assert_eq!(prepared.headers["x-simulated-trading"], "1");
    }

    #[test]
    fn test_sign_requires_passphrase() {
        let creds = Credentials {
            password: None,
            ..credentials()
        };
        let options = Map::new();
        let ctx = SignContext {
            exchange_id: "okx",
            base_url: "https://www.okx.com/api/v5",
            credentials: &creds,
            timestamp: 0,
            options: &options,
        };
        let request = SignRequest {
            path: "account/balance".into(),
            tier: "private".into(),
            ..SignRequest::default()
        };
        let err = OkxAdapter::new().sign(&request, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationError);
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_handle_errors_envelope_code() {
        let adapter = OkxAdapter::new();
        let (resp, body) = response(r#"{"code":"51001","msg":"Instrument ID does not exist","data":[]}"#);
        let err = adapter.handle_errors(&resp, Some(&body)).unwrap();
        assert_eq!(err.kind(), ErrorKind::BadSymbol);
        assert_eq!(err.code(), Some("51001"));

        let (resp, body) = response(r#"{"code":"59999","msg":"Something new","data":[]}"#);
        let err = adapter.handle_errors(&resp, Some(&body)).unwrap();
        assert_eq!(err.kind(), ErrorKind::ExchangeError);
    }

    #[test]
    fn test_handle_errors_item_code_wins() {
        let adapter = OkxAdapter::new();
        let (resp, body) = response(
            r#"{"code":"1","msg":"Operation failed.","data":[{"ordId":"","sCode":"51008","sMsg":"Order failed. Insufficient USDT balance"}]}"#,
        );
        let err = adapter.handle_errors(&resp, Some(&body)).unwrap();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(err.code(), Some("51008"));
    }

    #[test]
    fn test_handle_errors_success() {
        let adapter = OkxAdapter::new();
        let (resp, body) = response(r#"{"code":"0","msg":"","data":[{"ordId":"1","sCode":"0","sMsg":""}]}"#);
        assert!(adapter.handle_errors(&resp, Some(&body)).is_none());
        assert!(adapter.handle_errors(&resp, None).is_none());
    }

    #[test]
    fn test_demo_trading_flag() {
        let on = json!({"demoTrading": true}).as_object().cloned().unwrap();
        assert!(is_demo_trading(&on));
        assert!(!is_demo_trading(&Map::new()));
    }
}
