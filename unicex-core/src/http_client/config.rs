use std::time::Duration;

use crate::error::{Error, Result};

/// Transport settings, derived from the exchange configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Deadline for one round trip, body included
    pub timeout: Duration,
    /// TCP connection timeout
    pub connect_timeout: Duration,
    /// Log full requests and responses at debug level
    pub verbose: bool,
    /// Default User-Agent header value
    pub user_agent: String,
    /// Maximum response body size in bytes
    pub max_response_size: usize,
    /// Idle keep-alive connections kept per host
    pub pool_max_idle_per_host: usize,
    /// Idle connection lifetime
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            verbose: false,
            user_agent: concat!("unicex/", env!("CARGO_PKG_VERSION")).to_string(),
            max_response_size: 10 * 1024 * 1024,
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl HttpConfig {
    /// Rejects settings that cannot work.
    ///
    /// ```rust
    /// use unicex_core::http_client::HttpConfig;
    /// use std::time::Duration;
    ///
    /// assert!(HttpConfig::default().validate().is_ok());
    ///
    /// let invalid = HttpConfig { timeout: Duration::ZERO, ..Default::default() };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::internal("HTTP timeout must be greater than zero"));
        }
        if self.timeout > Duration::from_secs(300) {
            return Err(Error::internal(format!(
                "HTTP timeout {:?} exceeds 5 minutes",
                self.timeout
            )));
        }
        if self.max_response_size == 0 {
            return Err(Error::internal("max_response_size cannot be zero"));
        }
        Ok(())
    }
}
