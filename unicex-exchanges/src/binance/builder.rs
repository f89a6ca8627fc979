//! Binance exchange builder.

use std::time::Duration;

use serde_json::Value;
use unicex_core::{ExchangeConfigBuilder, Result};

use super::Binance;

/// Builder for creating Binance exchange instances.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use unicex_exchanges::binance::BinanceBuilder;
///
/// let binance = BinanceBuilder::new()
///     .api_key("your-api-key")
///     .secret("your-secret")
///     .timeout(Duration::from_secs(10))
///     .recv_window(10_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinanceBuilder {
    config: ExchangeConfigBuilder,
}

impl BinanceBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config = self.config.api_key(key);
        self
    }

    /// Sets the API secret.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config = self.config.secret(secret);
        self
    }

    /// Routes requests to the spot testnet.
    pub fn sandbox(mut self, enabled: bool) -> Self {
        self.config = self.config.sandbox(enabled);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Enables or disables client-side throttling.
    pub fn enable_rate_limit(mut self, enabled: bool) -> Self {
        self.config = self.config.enable_rate_limit(enabled);
        self
    }

    /// Sets the `recvWindow` sent with signed requests, in milliseconds.
    pub fn recv_window(mut self, millis: u64) -> Self {
        self.config = self.config.option("recvWindow", Value::from(millis));
        self
    }

    /// Points an api tier at another base url.
    pub fn url_override(mut self, tier: impl Into<String>, url: impl Into<String>) -> Self {
        self.config = self.config.url_override(tier, url);
        self
    }

    /// Builds the Binance instance.
    pub fn build(self) -> Result<Binance> {
        Binance::new(self.config.build())
    }
}
