//! Binance adapter: description, request signing and response hooks.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use unicex_core::adapter::ExchangeAdapter;
use unicex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign, urlencode};
use unicex_core::classifier::ExceptionTable;
use unicex_core::credentials::RequiredCredentials;
use unicex_core::description::ExchangeDescription;
use unicex_core::error::{ClassifiedError, Error, ErrorKind, Result};
use unicex_core::http_client::HttpResponse;
use unicex_core::parser_utils::{safe_string, value_to_i64};
use unicex_core::precision::PrecisionMode;
use unicex_core::signed_request::{HttpMethod, PreparedRequest, SignContext, SignRequest, join_url};
use unicex_core::types::{Market, Order, OrderStatus};
use unicex_core::BaseExchange;

use super::parser;

/// Default `recvWindow` in milliseconds.
pub const DEFAULT_RECV_WINDOW: i64 = 5000;

/// Error codes and messages documented by Binance.
pub fn exceptions() -> ExceptionTable {
    ExceptionTable::new()
        .exact("API key does not exist", ErrorKind::AuthenticationError)
        .exact("Order would trigger immediately.", ErrorKind::InvalidOrder)
        .exact(
            "Account has insufficient balance for requested action.",
            ErrorKind::InsufficientFunds,
        )
        .exact("Rest API trading is not enabled.", ErrorKind::ExchangeNotAvailable)
        .exact("You don't have permission.", ErrorKind::PermissionDenied)
        .exact("Market is closed.", ErrorKind::ExchangeNotAvailable)
        .exact("-1000", ErrorKind::ExchangeNotAvailable)
        .exact("-1003", ErrorKind::RateLimitExceeded)
        .exact("-1013", ErrorKind::InvalidOrder)
        .exact("-1021", ErrorKind::InvalidNonce)
        .exact("-1022", ErrorKind::AuthenticationError)
        .exact("-1100", ErrorKind::InvalidOrder)
        .exact("-1104", ErrorKind::ExchangeError)
        .exact("-1121", ErrorKind::BadSymbol)
        .exact("-1128", ErrorKind::ExchangeError)
        .exact("-2010", ErrorKind::ExchangeError)
        .exact("-2011", ErrorKind::OrderNotFound)
        .exact("-2013", ErrorKind::OrderNotFound)
        .exact("-2014", ErrorKind::AuthenticationError)
        .exact("-2015", ErrorKind::AuthenticationError)
        .exact("-3008", ErrorKind::InsufficientFunds)
        .exact("-3010", ErrorKind::ExchangeError)
        .broad("Too many requests", ErrorKind::RateLimitExceeded)
        .broad("Invalid symbol", ErrorKind::BadSymbol)
}

/// Plugs Binance into the generic engine.
#[derive(Debug, Clone)]
pub struct BinanceAdapter {
    exceptions: ExceptionTable,
}

impl Default for BinanceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceAdapter {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self {
            exceptions: exceptions(),
        }
    }

    fn sign_private(&self, request: &SignRequest, ctx: &SignContext<'_>) -> Result<PreparedRequest> {
        ctx.credentials
            .check_required(ctx.exchange_id, RequiredCredentials::API_KEY_SECRET)?;

        let recv_window = ctx
            .options
            .get("recvWindow")
            .and_then(value_to_i64)
            .unwrap_or(DEFAULT_RECV_WINDOW);

        let mut params = request.params.clone();
        params.insert("timestamp".to_string(), json!(ctx.timestamp));
        params.insert("recvWindow".to_string(), json!(recv_window));

        let query = urlencode(&params);
        let signature = hmac_sign(
            &query,
            ctx.credentials.secret()?,
            HashAlgorithm::Sha256,
            DigestFormat::Hex,
        )?;
        let signed = format!("{query}&signature={signature}");

        let mut headers = request.headers.clone();
        headers.insert("X-MBX-APIKEY".to_string(), ctx.credentials.api_key()?.to_string());

        let mut url = join_url(ctx.base_url, &request.path);
        let body = if request.method.uses_query() {
            url.push('?');
            url.push_str(&signed);
            None
        } else {
            headers.insert(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            );
            Some(signed)
        };

        Ok(PreparedRequest {
            url,
            method: request.method,
            headers,
            body,
        })
    }
}

#[async_trait]
impl ExchangeAdapter for BinanceAdapter {
    fn describe(&self) -> ExchangeDescription {
        ExchangeDescription::new("binance", "Binance")
            .version("v3")
            .rate_limit(50)
            .hostname("binance.com")
            .url("public", "https://api.{hostname}/api/v3")
            .url("private", "https://api.{hostname}/api/v3")
            .test_url("public", "https://testnet.binance.vision/api/v3")
            .test_url("private", "https://testnet.binance.vision/api/v3")
            .api("public", HttpMethod::Get, &["ping", "time", "exchangeInfo", "depth"])
            .api("private", HttpMethod::Get, &["order", "openOrders", "account"])
            .api("private", HttpMethod::Post, &["order"])
            .api("private", HttpMethod::Delete, &["order"])
            .exceptions(self.exceptions.clone())
            .precision_mode(PrecisionMode::TickSize)
            .required_credentials(RequiredCredentials::API_KEY_SECRET)
            .option("recvWindow", json!(DEFAULT_RECV_WINDOW))
    }

    fn sign(&self, request: &SignRequest, ctx: &SignContext<'_>) -> Result<PreparedRequest> {
        if request.tier == "private" {
            self.sign_private(request, ctx)
        } else {
            PreparedRequest::public(request, ctx)
        }
    }

    /// Some endpoints answer 200 with `{"success": false, "msg": ..}`.
    fn handle_errors(&self, response: &HttpResponse, decoded: Option<&Value>) -> Option<Error> {
        let body = decoded?;
        if body.get("success").and_then(Value::as_bool) != Some(false) {
            return None;
        }

        let message = safe_string(body, "msg").unwrap_or_default();
        let code = safe_string(body, "code");
        let kind = code
            .as_deref()
            .and_then(|c| self.exceptions.find_exact(c))
            .or_else(|| self.exceptions.find_exact(&message))
            .or_else(|| self.exceptions.find_broad(&message))
            .unwrap_or(ErrorKind::ExchangeError);

        let mut details = ClassifiedError::new(kind, format!("binance {}", response.body_preview()))
            .with_data(body.clone());
        if let Some(code) = code {
            details = details.with_code(code);
        }
        Some(details.into())
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
        let response = exchange.fetch("publicGetExchangeInfo", Map::new()).await?;
        let Some(symbols) = response.get("symbols").and_then(Value::as_array) else {
            return Err(Error::bad_response(format!(
                "{} exchangeInfo response has no symbols",
                exchange.id()
            )));
        };

        let mut markets = Vec::with_capacity(symbols.len());
        for raw in symbols {
            if let Some(market) = self.parse_market(raw)? {
                markets.push(market);
            }
        }
        Ok(markets)
    }
}
