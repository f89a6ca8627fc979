//! Binance REST operations behind the unified traits.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;
use unicex_core::error::{Error, Result};
use unicex_core::traits::{Account, MarketData, PublicExchange, Trading};
use unicex_core::types::{Balance, Order, OrderBook, OrderRequest, OrderType};
use unicex_core::BaseExchange;

use super::{Binance, parser};

impl PublicExchange for Binance {
    fn base(&self) -> &BaseExchange {
        &self.base
    }
}

#[async_trait]
impl MarketData for Binance {
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook> {
        let market = self.market(symbol).await?;
        let mut params = Map::new();
        params.insert("symbol".to_string(), json!(market.id));
        if let Some(limit) = limit {
            params.insert("limit".to_string(), json!(limit));
        }

        let response = self.base.fetch("publicGetDepth", params).await?;
        Ok(parser::parse_order_book(&response, &market.symbol))
    }
}

#[async_trait]
impl Trading for Binance {
    async fn create_order(&self, request: OrderRequest) -> Result<Order> {
        let market = self.market(&request.symbol).await?;

        let mut params = Map::new();
        params.insert("symbol".to_string(), json!(market.id));
        params.insert("side".to_string(), json!(request.side.to_string().to_uppercase()));
        params.insert(
            "type".to_string(),
            json!(request.order_type.to_string().to_uppercase()),
        );
        params.insert(
            "quantity".to_string(),
            json!(self.base.amount_to_precision(&market.symbol, request.amount).await?),
        );

        if request.order_type == OrderType::Limit {
            let price = request.price.ok_or_else(|| {
                Error::arguments_required(format!(
                    "binance create_order requires a price for {} limit orders",
                    market.symbol
                ))
            })?;
            params.insert(
                "price".to_string(),
                json!(self.base.price_to_precision(&market.symbol, price).await?),
            );
            params.insert("timeInForce".to_string(), json!("GTC"));
        }
        if let Some(client_order_id) = &request.client_order_id {
            params.insert("newClientOrderId".to_string(), json!(client_order_id));
        }

        debug!(symbol = %market.symbol, side = %request.side, "Placing order");
        let response = self.base.fetch("privatePostOrder", params).await?;
        self.base.adapter().parse_order(&response, Some(&market))
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order> {
        let market = self.market(symbol).await?;
        let mut params = Map::new();
        params.insert("symbol".to_string(), json!(market.id));
        params.insert("orderId".to_string(), json!(id));

        let response = self.base.fetch("privateDeleteOrder", params).await?;
        self.base.adapter().parse_order(&response, Some(&market))
    }

    async fn fetch_order(&self, id: &str, symbol: &str) -> Result<Order> {
        let market = self.market(symbol).await?;
        let mut params = Map::new();
        params.insert("symbol".to_string(), json!(market.id));
        params.insert("orderId".to_string(), json!(id));

        let response = self.base.fetch("privateGetOrder", params).await?;
        self.base.adapter().parse_order(&response, Some(&market))
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> Result<Vec<Order>> {
        self.base.load_markets().await?;
        let mut params = Map::new();
        if let Some(symbol) = symbol {
            let market = self.base.market(symbol).await?;
            params.insert("symbol".to_string(), json!(market.id));
        }

        let response = self.base.fetch("privateGetOpenOrders", params).await?;
        let Some(raw_orders) = response.as_array() else {
            return Err(Error::bad_response("binance openOrders response is not a list"));
        };

        let mut orders = Vec::with_capacity(raw_orders.len());
        for raw in raw_orders {
            let market_id = raw.get("symbol").and_then(Value::as_str).unwrap_or_default();
            let market = self.base.market_by_id(market_id).await.ok();
            orders.push(self.base.adapter().parse_order(raw, market.as_deref())?);
        }
        Ok(orders)
    }
}

#[async_trait]
impl Account for Binance {
    async fn fetch_balance(&self) -> Result<Balance> {
        let response = self.base.fetch("privateGetAccount", Map::new()).await?;
        Ok(parser::parse_balance(&response))
    }
}
