//! Binance spot exchange implementation.
//!
//! Public market data and private order management against the v3 REST API.
//! Private requests are signed with HMAC-SHA256 over the urlencoded
//! parameters, which always include `timestamp` and `recvWindow`.

use std::sync::Arc;

use unicex_core::types::Market;
use unicex_core::{BaseExchange, ExchangeConfig, Result};

pub mod adapter;
pub mod builder;
pub mod parser;
mod rest;

pub use adapter::BinanceAdapter;
pub use builder::BinanceBuilder;

/// Binance exchange structure.
#[derive(Debug)]
pub struct Binance {
    /// Base exchange instance.
    base: BaseExchange,
}

impl Binance {
    /// Creates a new Binance instance using the builder pattern.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unicex_exchanges::binance::Binance;
    ///
    /// let binance = Binance::builder()
    ///     .api_key("your-api-key")
    ///     .secret("your-secret")
    ///     .sandbox(true)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> BinanceBuilder {
        BinanceBuilder::new()
    }

    /// Creates a new Binance instance.
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let base = BaseExchange::new(config, Arc::new(BinanceAdapter::new()))?;
        Ok(Self { base })
    }

    /// Returns a reference to the base exchange.
    pub fn base(&self) -> &BaseExchange {
        &self.base
    }

    /// Loads markets if needed and resolves a unified symbol.
    pub(crate) async fn market(&self, symbol: &str) -> Result<Arc<Market>> {
        self.base.load_markets().await?;
        self.base.market(symbol).await
    }
}
