//! Unified operation traits.
//!
//! Adapters expose the same operations regardless of exchange. Each trait
//! covers one capability so an exchange implements only what it supports.
//!
//! # Trait Hierarchy
//!
//! ```text
//! PublicExchange (base trait - access to the shared engine)
//!     │
//!     ├── MarketData (markets, order books)
//!     ├── Trading (order management)
//!     └── Account (balances)
//!
//! FullExchange = PublicExchange + MarketData + Trading + Account
//! ```
//!
//! All traits are object-safe and `Send + Sync`:
//!
//! ```rust,ignore
//! use unicex_core::traits::ArcFullExchange;
//!
//! let exchange: ArcFullExchange = Arc::new(my_exchange);
//! tokio::spawn(async move { exchange.fetch_order_book("BTC/USDT", Some(5)).await });
//! ```

use std::sync::Arc;

mod account;
mod market_data;
mod public_exchange;
mod trading;

pub use account::{Account, BoxedAccount};
pub use market_data::{BoxedMarketData, MarketData};
pub use public_exchange::PublicExchange;
pub use trading::{BoxedTrading, Trading};

/// Combined trait for exchanges supporting every unified operation.
pub trait FullExchange: PublicExchange + MarketData + Trading + Account {}

impl<T> FullExchange for T where T: PublicExchange + MarketData + Trading + Account {}

/// Type alias for boxed FullExchange trait object.
pub type BoxedFullExchange = Box<dyn FullExchange>;

/// Type alias for Arc-wrapped FullExchange trait object.
pub type ArcFullExchange = Arc<dyn FullExchange>;

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // unwrap() is acceptable in tests
pub(crate) mod tests {
    use super::*;
    use crate::adapter::ExchangeAdapter;
    use crate::base_exchange::{BaseExchange, ExchangeConfig};
    use crate::description::ExchangeDescription;
    use crate::error::{Error, Result};
    use crate::types::{
        Balance, BalanceEntry, Market, Order, OrderBook, OrderRequest, OrderSide, OrderStatus,
    };
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    #[derive(Debug)]
    pub(crate) struct NullAdapter;

    #[async_trait]
    impl ExchangeAdapter for NullAdapter {
        fn describe(&self) -> ExchangeDescription {
            ExchangeDescription::new("mock", "Mock Exchange").url("public", "http://127.0.0.1:9")
        }

        fn parse_market(&self, _raw: &Value) -> Result<Option<Market>> {
            Ok(None)
        }

        fn parse_order(&self, _raw: &Value, _market: Option<&Market>) -> Result<Order> {
            Err(Error::not_supported("mock"))
        }

        async fn fetch_markets(&self, _exchange: &BaseExchange) -> Result<Vec<Market>> {
            Ok(vec![Market::spot("BTCUSDT", "BTC", "USDT")])
        }
    }

    /// In-memory exchange implementing every trait.
    pub(crate) struct MockExchange {
        base: BaseExchange,
    }

    impl MockExchange {
        pub(crate) fn new() -> Self {
            Self {
                base: BaseExchange::new(ExchangeConfig::default(), Arc::new(NullAdapter)).unwrap(),
            }
        }
    }

    impl PublicExchange for MockExchange {
        fn base(&self) -> &BaseExchange {
            &self.base
        }
    }

    #[async_trait]
    impl MarketData for MockExchange {
        async fn fetch_order_book(&self, symbol: &str, _limit: Option<u32>) -> Result<OrderBook> {
            Ok(OrderBook {
                symbol: symbol.to_string(),
                ..OrderBook::default()
            })
        }
    }

    #[async_trait]
    impl Trading for MockExchange {
        async fn create_order(&self, request: OrderRequest) -> Result<Order> {
            Ok(Order {
                id: "1".into(),
                symbol: request.symbol,
                side: Some(request.side),
                order_type: Some(request.order_type),
                amount: Some(request.amount),
                price: request.price,
                status: Some(OrderStatus::Open),
                ..Order::default()
            })
        }

        async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order> {
            Ok(Order {
                id: id.into(),
                symbol: symbol.into(),
                status: Some(OrderStatus::Canceled),
                ..Order::default()
            })
        }

        async fn fetch_order(&self, id: &str, symbol: &str) -> Result<Order> {
            Ok(Order {
                id: id.into(),
                symbol: symbol.into(),
                ..Order::default()
            })
        }

        async fn fetch_open_orders(&self, _symbol: Option<&str>) -> Result<Vec<Order>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl Account for MockExchange {
        async fn fetch_balance(&self) -> Result<Balance> {
            let mut balance = Balance::default();
            balance.set("USDT", BalanceEntry::new(dec!(10), dec!(5)));
            Ok(balance)
        }
    }

    #[tokio::test]
    async fn test_full_exchange_object() {
        let exchange: ArcFullExchange = Arc::new(MockExchange::new());
        assert_eq!(exchange.id(), "mock");
        assert_eq!(exchange.name(), "Mock Exchange");

        let markets = exchange.load_markets().await.unwrap();
        assert!(markets.contains_key("BTC/USDT"));

        let order = exchange.limit_buy("BTC/USDT", dec!(1), dec!(100)).await.unwrap();
        assert_eq!(order.side, Some(OrderSide::Buy));
        assert_eq!(order.price, Some(dec!(100)));

        let entry = exchange.get_balance("USDT").await.unwrap();
        assert_eq!(entry.total, Some(dec!(15)));
        assert!(exchange.get_balance("BTC").await.is_err());
    }
}
