//! OKX exchange implementation.
//!
//! Spot trading over the unified V5 REST API. Private requests carry an
//! HMAC-SHA256 signature (Base64) of `timestamp + method + path + body` and
//! need a passphrase besides the key and secret.

use std::sync::Arc;

use serde_json::Value;
use unicex_core::types::Market;
use unicex_core::{BaseExchange, ExchangeConfig, Result};

pub mod adapter;
pub mod builder;
pub mod parser;
mod rest;

pub use adapter::OkxAdapter;
pub use builder::OkxBuilder;

/// OKX exchange structure.
#[derive(Debug)]
pub struct Okx {
    /// Base exchange instance.
    base: BaseExchange,
}

impl Okx {
    /// Creates a new OKX instance using the builder pattern.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unicex_exchanges::okx::Okx;
    ///
    /// let okx = Okx::builder()
    ///     .api_key("your-api-key")
    ///     .secret("your-secret")
    ///     .passphrase("your-passphrase")
    ///     .sandbox(true)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> OkxBuilder {
        OkxBuilder::new()
    }

    /// Creates a new OKX instance.
    ///
    /// OKX runs demo trading on the production hosts, so sandbox mode turns
    /// on the `demoTrading` option, which adds the simulated-trading header.
    pub fn new(mut config: ExchangeConfig) -> Result<Self> {
        if config.sandbox {
            config
                .options
                .insert("demoTrading".to_string(), Value::Bool(true));
        }
        let base = BaseExchange::new(config, Arc::new(OkxAdapter::new()))?;
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
