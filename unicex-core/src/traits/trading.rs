//! Trading trait definition.
//!
//! Order management: placing, canceling and querying orders. All methods
//! require credentials.
//!
//! # Example
//!
//! ```rust,ignore
//! use unicex_core::traits::Trading;
//! use rust_decimal_macros::dec;
//!
//! let order = exchange.limit_buy("BTC/USDT", dec!(0.01), dec!(50000)).await?;
//! exchange.cancel_order(&order.id, "BTC/USDT").await?;
//! ```

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::PublicExchange;
use crate::error::Result;
use crate::types::{Order, OrderRequest, OrderSide};

/// Trait for order management.
#[async_trait]
pub trait Trading: PublicExchange {
    /// Places an order.
    async fn create_order(&self, request: OrderRequest) -> Result<Order>;

    /// Cancels an order by exchange id.
    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order>;

    /// Fetches one order by exchange id.
    async fn fetch_order(&self, id: &str, symbol: &str) -> Result<Order>;

    /// Fetches resting orders, optionally for a single symbol.
    async fn fetch_open_orders(&self, symbol: Option<&str>) -> Result<Vec<Order>>;

    /// Market buy.
    async fn market_buy(&self, symbol: &str, amount: Decimal) -> Result<Order> {
        self.create_order(OrderRequest::market(symbol, OrderSide::Buy, amount))
            .await
    }

    /// Market sell.
    async fn market_sell(&self, symbol: &str, amount: Decimal) -> Result<Order> {
        self.create_order(OrderRequest::market(symbol, OrderSide::Sell, amount))
            .await
    }

    /// Limit buy.
    async fn limit_buy(&self, symbol: &str, amount: Decimal, price: Decimal) -> Result<Order> {
        self.create_order(OrderRequest::limit(symbol, OrderSide::Buy, amount, price))
            .await
    }

    /// Limit sell.
    async fn limit_sell(&self, symbol: &str, amount: Decimal, price: Decimal) -> Result<Order> {
        self.create_order(OrderRequest::limit(symbol, OrderSide::Sell, amount, price))
            .await
    }
}

/// Type alias for boxed Trading trait object.
pub type BoxedTrading = Box<dyn Trading>;

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::traits::tests::MockExchange;
    use crate::types::{OrderStatus, OrderType};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_convenience_methods() {
        let exchange = MockExchange::new();

        let order = exchange.market_sell("BTC/USDT", dec!(2)).await.unwrap();
        assert_eq!(order.side, Some(OrderSide::Sell));
        assert_eq!(order.order_type, Some(OrderType::Market));
        assert_eq!(order.price, None);

        let order = exchange
            .limit_sell("BTC/USDT", dec!(1), dec!(42000))
            .await
            .unwrap();
        assert_eq!(order.order_type, Some(OrderType::Limit));
        assert_eq!(order.price, Some(dec!(42000)));
    }

    #[tokio::test]
    async fn test_boxed_cancel() {
        let exchange: BoxedTrading = Box::new(MockExchange::new());
        let order = exchange.cancel_order("7", "BTC/USDT").await.unwrap();
        assert_eq!(order.id, "7");
        assert_eq!(order.status, Some(OrderStatus::Canceled));
        assert!(exchange.fetch_open_orders(None).await.unwrap().is_empty());
    }
}
