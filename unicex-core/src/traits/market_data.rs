//! MarketData trait definition.
//!
//! Public market information: the market catalog and order book snapshots.
//! None of these operations require credentials.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::PublicExchange;
use crate::error::Result;
use crate::types::{Market, OrderBook};

/// Trait for fetching public market data.
///
/// `fetch_markets` and `load_markets` have defaults that route through the
/// adapter and the shared registry; implementations normally only provide
/// `fetch_order_book`.
#[async_trait]
pub trait MarketData: PublicExchange {
    /// Fetches the market catalog from the exchange without caching it.
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        let base = self.base();
        base.adapter().fetch_markets(base).await
    }

    /// Loads and caches markets; concurrent callers share a single fetch.
    async fn load_markets(&self) -> Result<HashMap<String, Arc<Market>>> {
        self.base().load_markets().await
    }

    /// Refetches markets, replacing the cache.
    async fn reload_markets(&self) -> Result<HashMap<String, Arc<Market>>> {
        self.base().reload_markets().await
    }

    /// Fetches an order book snapshot.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Unified symbol (e.g., "BTC/USDT")
    /// * `limit` - Depth requested from the exchange
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook>;
}

/// Type alias for boxed MarketData trait object.
pub type BoxedMarketData = Box<dyn MarketData>;
