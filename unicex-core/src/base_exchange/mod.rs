//! Base exchange implementation
//!
//! Provides the functionality every adapter shares:
//! - One-time, single-flight market loading into a [`MarketRegistry`]
//! - Configuration and credential checks
//! - The request pipeline (see `requests.rs`)
//! - Precision helpers driven by the loaded market metadata
//! - Client-side throttling

mod config;
mod market_registry;
mod requests;

pub use config::{ExchangeConfig, ExchangeConfigBuilder};
pub use market_registry::{MarketRegistry, common_currency_code};

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::adapter::ExchangeAdapter;
use crate::credentials::Credentials;
use crate::description::{EndpointTable, ExchangeDescription};
use crate::error::{Error, Result};
use crate::http_client::HttpClient;
use crate::precision::{PaddingMode, PrecisionMode, RoundingMode, decimal_to_precision};
use crate::rate_limiter::RateLimiter;
use crate::types::{Currency, Market};

/// Base exchange implementation
#[derive(Debug)]
pub struct BaseExchange {
    config: ExchangeConfig,
    description: ExchangeDescription,
    endpoints: EndpointTable,
    options: Map<String, Value>,
    adapter: Arc<dyn ExchangeAdapter>,
    http_client: HttpClient,
    rate_limiter: Option<RateLimiter>,
    registry: Arc<RwLock<MarketRegistry>>,
    loading_lock: Mutex<()>,
}

impl BaseExchange {
    /// Creates an exchange client around `adapter`.
    ///
    /// # Errors
    ///
    /// `InternalError` when the transport settings are unusable.
    pub fn new(config: ExchangeConfig, adapter: Arc<dyn ExchangeAdapter>) -> Result<Self> {
        let description = adapter.describe();
        info!(exchange = %description.id, sandbox = config.sandbox, "Initializing exchange");

        if config.timeout > Duration::from_secs(300) {
            warn!(
                timeout_secs = config.timeout.as_secs(),
                "Request timeout exceeds 5 minutes"
            );
        }

        let http_client = HttpClient::new(config.to_http_config())?;

        let rate_limiter = config.enable_rate_limit.then(|| {
            let millis = config.rate_limit.unwrap_or(description.rate_limit);
            RateLimiter::from_interval(Duration::from_millis(millis))
        });

        let mut options = description.options.clone();
        options.extend(config.options.clone());

        Ok(Self {
            endpoints: EndpointTable::new(&description),
            config,
            description,
            options,
            adapter,
            http_client,
            rate_limiter,
            registry: Arc::new(RwLock::new(MarketRegistry::new())),
            loading_lock: Mutex::new(()),
        })
    }

    /// Exchange id, e.g. `binance`.
    pub fn id(&self) -> &str {
        &self.description.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.description.name
    }

    /// The adapter's static description.
    pub fn description(&self) -> &ExchangeDescription {
        &self.description
    }

    /// Configuration supplied at construction.
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Description defaults overlaid with user options.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Credentials supplied at construction.
    pub fn credentials(&self) -> &Credentials {
        &self.config.credentials
    }

    /// How this exchange expresses precision.
    pub fn precision_mode(&self) -> PrecisionMode {
        self.description.precision_mode
    }

    /// The plugged-in adapter.
    pub fn adapter(&self) -> &Arc<dyn ExchangeAdapter> {
        &self.adapter
    }

    /// Name-addressable endpoint catalog.
    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Fails with `AuthenticationError` when a credential private endpoints
    /// need is missing.
    pub fn check_required_credentials(&self) -> Result<()> {
        self.config
            .credentials
            .check_required(self.id(), self.description.required_credentials)
    }

    // ==================== Markets ====================

    /// Loads markets once; later calls return the cached index without a
    /// network round trip. Concurrent first calls share one fetch.
    pub async fn load_markets(&self) -> Result<HashMap<String, Arc<Market>>> {
        {
            let registry = self.registry.read().await;
            if registry.is_loaded() {
                return Ok(registry.markets().clone());
            }
        }

        let _loading_guard = self.loading_lock.lock().await;
        {
            let registry = self.registry.read().await;
            if registry.is_loaded() {
                debug!(exchange = self.id(), "Markets loaded by a concurrent caller");
                return Ok(registry.markets().clone());
            }
        }
        self.fetch_and_set_markets().await
    }

    /// Fetches markets again and replaces the index.
    pub async fn reload_markets(&self) -> Result<HashMap<String, Arc<Market>>> {
        let _loading_guard = self.loading_lock.lock().await;
        self.fetch_and_set_markets().await
    }

    async fn fetch_and_set_markets(&self) -> Result<HashMap<String, Arc<Market>>> {
        info!(exchange = self.id(), "Loading markets");
        let markets = self.adapter.fetch_markets(self).await?;
        let currencies = self.adapter.fetch_currencies(self).await?;
        self.set_markets(markets, currencies).await
    }

    /// Replaces the registry contents directly.
    pub async fn set_markets(
        &self,
        markets: Vec<Market>,
        currencies: Option<Vec<Currency>>,
    ) -> Result<HashMap<String, Arc<Market>>> {
        let mut registry = self.registry.write().await;
        Ok(registry
            .set_markets(markets, currencies, self.precision_mode())
            .clone())
    }

    /// Whether markets are loaded.
    pub async fn markets_loaded(&self) -> bool {
        self.registry.read().await.is_loaded()
    }

    /// Market for a unified symbol.
    ///
    /// # Errors
    ///
    /// `ExchangeError` before markets are loaded, `BadSymbol` for an unknown
    /// symbol.
    pub async fn market(&self, symbol: &str) -> Result<Arc<Market>> {
        let registry = self.registry.read().await;
        if !registry.is_loaded() {
            return Err(Error::exchange(format!(
                "{} markets not loaded, call load_markets() first",
                self.id()
            )));
        }
        registry.market(symbol)
    }

    /// Market for a native id; `BadSymbol` when unknown.
    pub async fn market_by_id(&self, id: &str) -> Result<Arc<Market>> {
        self.registry
            .read()
            .await
            .market_by_id(id)
            .ok_or_else(|| Error::bad_symbol(format!("{} has no market with id {id}", self.id())))
    }

    /// Market for a native id, or a placeholder whose symbol is the id.
    pub async fn safe_market(&self, id: &str) -> Arc<Market> {
        match self.registry.read().await.market_by_id(id) {
            Some(market) => market,
            None => Arc::new(Market {
                id: id.to_string(),
                symbol: id.to_string(),
                ..Market::default()
            }),
        }
    }

    /// Currency for a unified code.
    pub async fn currency(&self, code: &str) -> Result<Arc<Currency>> {
        self.registry.read().await.currency(code)
    }

    /// Unified code for a native currency id, resolving aliases.
    pub async fn safe_currency_code(&self, currency_id: &str) -> String {
        self.registry.read().await.safe_currency_code(currency_id)
    }

    /// Sorted unified symbols.
    pub async fn symbols(&self) -> Vec<String> {
        self.registry.read().await.symbols().to_vec()
    }

    // ==================== Precision ====================

    fn format(&self, value: Decimal, mode: RoundingMode, precision: Option<Decimal>) -> Result<String> {
        decimal_to_precision(
            value,
            mode,
            precision,
            self.precision_mode(),
            PaddingMode::NoPadding,
        )
    }

    /// Rounds a price to the market's price precision.
    pub async fn price_to_precision(&self, symbol: &str, price: Decimal) -> Result<String> {
        let market = self.market(symbol).await?;
        self.format(price, RoundingMode::Round, market.precision.price)
    }

    /// Truncates an amount to the market's amount precision.
    pub async fn amount_to_precision(&self, symbol: &str, amount: Decimal) -> Result<String> {
        let market = self.market(symbol).await?;
        self.format(amount, RoundingMode::Truncate, market.precision.amount)
    }

    /// Truncates a cost to the market's cost precision, falling back to the
    /// price precision.
    pub async fn cost_to_precision(&self, symbol: &str, cost: Decimal) -> Result<String> {
        let market = self.market(symbol).await?;
        let precision = market.precision.cost.or(market.precision.price);
        self.format(cost, RoundingMode::Truncate, precision)
    }

    /// Rounds a fee to the market's price precision.
    pub async fn fee_to_precision(&self, symbol: &str, fee: Decimal) -> Result<String> {
        let market = self.market(symbol).await?;
        self.format(fee, RoundingMode::Round, market.precision.price)
    }

    /// Rounds an amount of `code` to the currency's precision.
    pub async fn currency_to_precision(&self, code: &str, amount: Decimal) -> Result<String> {
        let currency = self.currency(code).await?;
        self.format(amount, RoundingMode::Round, currency.precision)
    }

    // ==================== Throttle ====================

    /// Waits for the client-side rate limiter, when enabled.
    pub async fn throttle(&self, cost: f64) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire(cost).await;
        }
    }
}
