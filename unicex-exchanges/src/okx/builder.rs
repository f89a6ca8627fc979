//! OKX exchange builder.

use std::time::Duration;

use unicex_core::{ExchangeConfigBuilder, Result};

use super::Okx;

/// Builder for creating OKX exchange instances.
///
/// # Example
///
/// ```no_run
/// use unicex_exchanges::okx::OkxBuilder;
///
/// let okx = OkxBuilder::new()
///     .api_key("your-api-key")
///     .secret("your-secret")
///     .passphrase("your-passphrase")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct OkxBuilder {
    config: ExchangeConfigBuilder,
}

impl OkxBuilder {
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

    /// Sets the passphrase chosen when the API key was created.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.config = self.config.password(passphrase);
        self
    }

    /// Enables demo trading.
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

    /// Points an api tier at another base url.
    pub fn url_override(mut self, tier: impl Into<String>, url: impl Into<String>) -> Self {
        self.config = self.config.url_override(tier, url);
        self
    }

    /// Builds the OKX instance.
    pub fn build(self) -> Result<Okx> {
        Okx::new(self.config.build())
    }
}
