//! Exchange configuration structures and builders

use crate::credentials::{Credentials, SecretString};
use crate::http_client::HttpConfig;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Exchange configuration
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Credentials (zeroed on drop, redacted in `Debug`)
    pub credentials: Credentials,
    /// Throttle requests client side
    pub enable_rate_limit: bool,
    /// Overrides the description's request spacing, in milliseconds
    pub rate_limit: Option<u64>,
    /// Request timeout (default: 30 seconds)
    pub timeout: Duration,
    /// TCP connection timeout (default: 10 seconds)
    pub connect_timeout: Duration,
    /// Use the exchange's test urls
    pub sandbox: bool,
    /// Custom user agent string
    pub user_agent: Option<String>,
    /// Log full requests and responses at debug level
    pub verbose: bool,
    /// Exchange-specific options, layered over the description's defaults
    pub options: Map<String, Value>,
    /// Base url per tier, replacing the description's (used with mock servers)
    pub url_overrides: HashMap<String, String>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            enable_rate_limit: true,
            rate_limit: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            sandbox: false,
            user_agent: None,
            verbose: false,
            options: Map::new(),
            url_overrides: HashMap::new(),
        }
    }
}

impl ExchangeConfig {
    /// Create a new configuration builder
    ///
    /// # Example
    ///
    /// ```rust
    /// use unicex_core::base_exchange::ExchangeConfig;
    ///
    /// let config = ExchangeConfig::builder()
    ///     .api_key("your-api-key")
    ///     .secret("your-secret")
    ///     .sandbox(true)
    ///     .build();
    /// assert!(config.sandbox);
    /// ```
    pub fn builder() -> ExchangeConfigBuilder {
        ExchangeConfigBuilder::default()
    }

    /// Transport settings derived from this configuration.
    pub fn to_http_config(&self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            verbose: self.verbose,
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| defaults.user_agent.clone()),
            ..defaults
        }
    }
}

/// Builder for `ExchangeConfig`
///
/// ```rust
/// use unicex_core::base_exchange::ExchangeConfigBuilder;
/// use std::time::Duration;
///
/// let config = ExchangeConfigBuilder::new()
///     .api_key("your-api-key")
///     .secret("your-secret")
///     .password("passphrase")
///     .timeout(Duration::from_secs(60))
///     .build();
/// assert_eq!(config.timeout, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExchangeConfigBuilder {
    config: ExchangeConfig,
}

impl ExchangeConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.credentials.api_key = Some(SecretString::new(key));
        self
    }

    /// Set the signing secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.credentials.secret = Some(SecretString::new(secret));
        self
    }

    /// Set the passphrase
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.credentials.password = Some(SecretString::new(password));
        self
    }

    /// Set the user id
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.config.credentials.uid = Some(SecretString::new(uid));
        self
    }

    /// Enable or disable client-side throttling
    pub fn enable_rate_limit(mut self, enabled: bool) -> Self {
        self.config.enable_rate_limit = enabled;
        self
    }

    /// Set the spacing between requests in milliseconds
    pub fn rate_limit(mut self, millis: u64) -> Self {
        self.config.rate_limit = Some(millis);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the TCP connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Use test urls
    pub fn sandbox(mut self, enabled: bool) -> Self {
        self.config.sandbox = enabled;
        self
    }

    /// Set a custom user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Enable verbose request logging
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.config.verbose = enabled;
        self
    }

    /// Set one option
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.options.insert(key.into(), value);
        self
    }

    /// Replace all options
    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.config.options = options;
        self
    }

    /// Point one api tier at another base url
    pub fn url_override(mut self, tier: impl Into<String>, url: impl Into<String>) -> Self {
        self.config.url_overrides.insert(tier.into(), url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ExchangeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::default();
        assert!(config.enable_rate_limit);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ExchangeConfig::builder()
            .api_key("k")
            .secret("s")
            .rate_limit(50)
            .enable_rate_limit(false)
            .option("defaultType", json!("spot"))
            .url_override("public", "http://localhost:1")
            .build();
        assert_eq!(config.credentials.api_key().unwrap(), "k");
        assert_eq!(config.rate_limit, Some(50));
        assert!(!config.enable_rate_limit);
        assert_eq!(config.options["defaultType"], "spot");
        assert_eq!(config.url_overrides["public"], "http://localhost:1");
    }

    #[test]
    fn test_to_http_config() {
        let config = ExchangeConfig::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("bot/1.0")
            .verbose(true)
            .build();
        let http = config.to_http_config();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.user_agent, "bot/1.0");
        assert!(http.verbose);
        assert_eq!(http.max_response_size, 10 * 1024 * 1024);
    }
}
