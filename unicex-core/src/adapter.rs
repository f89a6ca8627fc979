//! The per-exchange plug-in contract.
//!
//! [`BaseExchange`](crate::base_exchange::BaseExchange) owns the request
//! lifecycle and calls back into an [`ExchangeAdapter`] at fixed points:
//! `describe` once at construction, `sign` before every transmit,
//! `handle_errors` before the generic classifier, and the `parse_*` hooks
//! when adapters turn decoded payloads into unified types.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::base_exchange::BaseExchange;
use crate::description::ExchangeDescription;
use crate::error::{Error, Result};
use crate::http_client::HttpResponse;
use crate::signed_request::{PreparedRequest, SignContext, SignRequest};
use crate::types::{Currency, Market, Order, OrderStatus};

/// Exchange-specific behavior plugged into the generic engine.
///
/// Only `describe`, `parse_market`, `parse_order` and `fetch_markets` are
/// required; every other hook has a working default.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync + Debug {
    /// Static configuration: urls, endpoint catalog, error tables.
    fn describe(&self) -> ExchangeDescription;

    /// Builds the outgoing request. The default handles unauthenticated
    /// endpoints only.
    fn sign(&self, request: &SignRequest, ctx: &SignContext<'_>) -> Result<PreparedRequest> {
        PreparedRequest::public(request, ctx)
    }

    /// Classifies payload shapes the generic tables miss. A returned error
    /// is surfaced as is and the generic classifier does not run.
    fn handle_errors(&self, _response: &HttpResponse, _decoded: Option<&Value>) -> Option<Error> {
        None
    }

    /// One raw market record to a [`Market`]; `Ok(None)` skips the record.
    fn parse_market(&self, raw: &Value) -> Result<Option<Market>>;

    /// One raw order record to an [`Order`].
    fn parse_order(&self, raw: &Value, market: Option<&Market>) -> Result<Order>;

    /// Native status string to the shared vocabulary.
    fn parse_order_status(&self, _status: &str) -> Option<OrderStatus> {
        None
    }

    /// Downloads and parses every market.
    async fn fetch_markets(&self, exchange: &BaseExchange) -> Result<Vec<Market>>;

    /// Downloads explicit currency records, when the exchange has them.
    async fn fetch_currencies(&self, _exchange: &BaseExchange) -> Result<Option<Vec<Currency>>> {
        Ok(None)
    }
}
