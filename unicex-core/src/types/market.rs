//! Market type definitions
//!
//! A [`Market`] describes one tradable instrument. Markets are created during
//! market loading and never mutated once they sit in the registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Market type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    /// Spot market
    #[default]
    Spot,
    /// Dated futures contract
    Future,
    /// Perpetual swap
    Swap,
    /// Options contract
    Option,
}

impl std::fmt::Display for MarketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Future => write!(f, "future"),
            Self::Swap => write!(f, "swap"),
            Self::Option => write!(f, "option"),
        }
    }
}

/// Inclusive bounds; either side may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMax {
    /// Lower bound
    pub min: Option<Decimal>,
    /// Upper bound
    pub max: Option<Decimal>,
}

impl MinMax {
    /// Bounds from two optional values.
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }
}

/// Precision record. Each value is a digit count or a step, depending on the
/// exchange's precision mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPrecision {
    /// Amount precision
    pub amount: Option<Decimal>,
    /// Price precision
    pub price: Option<Decimal>,
    /// Cost precision
    pub cost: Option<Decimal>,
    /// Base currency precision, when published separately
    pub base: Option<Decimal>,
    /// Quote currency precision, when published separately
    pub quote: Option<Decimal>,
}

/// Order parameter bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketLimits {
    /// Amount limits
    pub amount: MinMax,
    /// Price limits
    pub price: MinMax,
    /// Cost (amount * price) limits
    pub cost: MinMax,
}

/// A tradable instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Exchange-native id, e.g. `"BTCUSDT"`
    pub id: String,
    /// Unified symbol, e.g. `"BTC/USDT"`
    pub symbol: String,
    /// Unified base currency code
    pub base: String,
    /// Unified quote currency code
    pub quote: String,
    /// Exchange-native base currency id
    pub base_id: String,
    /// Exchange-native quote currency id
    pub quote_id: String,
    /// Settlement currency for derivatives
    pub settle: Option<String>,
    /// Instrument type
    #[serde(rename = "type")]
    pub market_type: MarketType,
    /// Spot market flag
    pub spot: bool,
    /// Dated futures flag
    pub future: bool,
    /// Perpetual swap flag
    pub swap: bool,
    /// Options flag
    pub option: bool,
    /// Open for trading
    pub active: bool,
    /// Precision record
    pub precision: MarketPrecision,
    /// Order bounds
    pub limits: MarketLimits,
    /// Maker fee rate
    pub maker: Option<Decimal>,
    /// Taker fee rate
    pub taker: Option<Decimal>,
    /// The untouched source record
    pub info: Value,
}

impl Market {
    /// A spot market whose symbol is derived from `base` and `quote`.
    ///
    /// Native currency ids default to the unified codes; adapters overwrite
    /// them when the exchange spells them differently.
    ///
    /// ```
    /// use unicex_core::types::Market;
    ///
    /// let market = Market::spot("BTCUSDT", "BTC", "USDT");
    /// assert_eq!(market.symbol, "BTC/USDT");
    /// assert!(market.spot);
    /// ```
    pub fn spot(id: impl Into<String>, base: impl Into<String>, quote: impl Into<String>) -> Self {
        let base = base.into();
        let quote = quote.into();
        Self {
            id: id.into(),
            symbol: Self::unified_symbol(&base, &quote),
            base_id: base.clone(),
            quote_id: quote.clone(),
            base,
            quote,
            market_type: MarketType::Spot,
            spot: true,
            active: true,
            ..Self::default()
        }
    }

    /// `BASE/QUOTE`
    pub fn unified_symbol(base: &str, quote: &str) -> String {
        format!("{base}/{quote}")
    }

    /// Sets the type and the matching boolean flag.
    #[must_use]
    pub fn with_type(mut self, market_type: MarketType) -> Self {
        self.market_type = market_type;
        self.spot = market_type == MarketType::Spot;
        self.future = market_type == MarketType::Future;
        self.swap = market_type == MarketType::Swap;
        self.option = market_type == MarketType::Option;
        self
    }

    /// Whether this is a derivative contract.
    pub fn is_contract(&self) -> bool {
        self.future || self.swap || self.option
    }
}
