//! OKX REST operations behind the unified traits.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;
use unicex_core::error::{Error, Result};
use unicex_core::parser_utils::safe_string;
use unicex_core::traits::{Account, MarketData, PublicExchange, Trading};
use unicex_core::types::{Balance, Market, Order, OrderBook, OrderRequest, OrderType};
use unicex_core::BaseExchange;

use super::{Okx, parser};

impl Okx {
    /// Parses the single order an order endpoint answers with.
    ///
    /// Acknowledgements only carry ids, so the request fills in the rest.
    fn parse_single_order(&self, response: &Value, market: &Market) -> Result<Order> {
        let raw = parser::first_item(response)?;
        self.base.adapter().parse_order(raw, Some(market))
    }
}

impl PublicExchange for Okx {
    fn base(&self) -> &BaseExchange {
        &self.base
    }
}

#[async_trait]
impl MarketData for Okx {
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook> {
        let market = self.market(symbol).await?;
        let mut params = Map::new();
        params.insert("instId".to_string(), json!(market.id));
        if let Some(limit) = limit {
            params.insert("sz".to_string(), json!(limit));
        }

        let response = self.base.fetch("publicGetMarketBooks", params).await?;
        parser::parse_order_book(&response, &market.symbol)
    }
}

#[async_trait]
impl Trading for Okx {
    async fn create_order(&self, request: OrderRequest) -> Result<Order> {
        let market = self.market(&request.symbol).await?;
        let td_mode = self
            .base
            .options()
            .get("tdMode")
            .and_then(Value::as_str)
            .unwrap_or("cash")
            .to_string();

        let mut params = Map::new();
        params.insert("instId".to_string(), json!(market.id));
        params.insert("tdMode".to_string(), json!(td_mode));
        params.insert("side".to_string(), json!(request.side.to_string().to_lowercase()));
        params.insert(
            "ordType".to_string(),
            json!(request.order_type.to_string().to_lowercase()),
        );
        params.insert(
            "sz".to_string(),
            json!(self.base.amount_to_precision(&market.symbol, request.amount).await?),
        );

        match request.order_type {
            OrderType::Limit => {
                let price = request.price.ok_or_else(|| {
                    Error::arguments_required(format!(
                        "okx create_order requires a price for {} limit orders",
                        market.symbol
                    ))
                })?;
                params.insert(
                    "px".to_string(),
                    json!(self.base.price_to_precision(&market.symbol, price).await?),
                );
            }
            // spot market buys are sized in quote currency unless told otherwise
            OrderType::Market => {
                params.insert("tgtCcy".to_string(), json!("base_ccy"));
            }
        }
        if let Some(client_order_id) = &request.client_order_id {
            params.insert("clOrdId".to_string(), json!(client_order_id));
        }

        debug!(symbol = %market.symbol, side = %request.side, "Placing order");
        let response = self.base.fetch("privatePostTradeOrder", params).await?;
        let mut order = self.parse_single_order(&response, &market)?;

        order.side = order.side.or(Some(request.side));
        order.order_type = order.order_type.or(Some(request.order_type));
        order.amount = order.amount.or(Some(request.amount));
        order.price = order.price.or(request.price);
        if order.client_order_id.is_none() {
            order.client_order_id = request.client_order_id;
        }
        Ok(order.complete())
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order> {
        let market = self.market(symbol).await?;
        let mut params = Map::new();
        params.insert("instId".to_string(), json!(market.id));
        params.insert("ordId".to_string(), json!(id));

        let response = self.base.fetch("privatePostTradeCancelOrder", params).await?;
        self.parse_single_order(&response, &market)
    }

    async fn fetch_order(&self, id: &str, symbol: &str) -> Result<Order> {
        let market = self.market(symbol).await?;
        let mut params = Map::new();
        params.insert("instId".to_string(), json!(market.id));
        params.insert("ordId".to_string(), json!(id));

        let response = self.base.fetch("privateGetTradeOrder", params).await?;
        self.parse_single_order(&response, &market)
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> Result<Vec<Order>> {
        self.base.load_markets().await?;
        let mut params = Map::new();
        params.insert("instType".to_string(), json!("SPOT"));
        if let Some(symbol) = symbol {
            let market = self.base.market(symbol).await?;
            params.insert("instId".to_string(), json!(market.id));
        }

        let response = self.base.fetch("privateGetTradeOrdersPending", params).await?;
        let raw_orders = parser::data_list(&response)?;

        let mut orders = Vec::with_capacity(raw_orders.len());
        for raw in raw_orders {
            let market_id = safe_string(raw, "instId").unwrap_or_default();
            let market = self.base.market_by_id(&market_id).await.ok();
            orders.push(self.base.adapter().parse_order(raw, market.as_deref())?);
        }
        Ok(orders)
    }
}

#[async_trait]
impl Account for Okx {
    async fn fetch_balance(&self) -> Result<Balance> {
        let response = self.base.fetch("privateGetAccountBalance", Map::new()).await?;
        parser::parse_balance(&response)
    }
}
