//! Market and currency indices.
//!
//! Filled once per client by [`BaseExchange::load_markets`](super::BaseExchange::load_markets)
//! and read by every request afterwards. Records are `Arc`ed so lookups hand
//! out cheap shared references.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::info;

use crate::error::{Error, Result};
use crate::precision::PrecisionMode;
use crate::types::{Currency, Market};

/// Digits assumed for a currency whose markets publish no precision.
const DEFAULT_CURRENCY_DIGITS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);
/// Step assumed for the same case in tick-size mode (1e-8).
const DEFAULT_CURRENCY_TICK: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

/// Legacy or exchange-specific codes mapped to their common form.
const CURRENCY_ALIASES: [(&str, &str); 5] = [
    ("XBT", "BTC"),
    ("BCC", "BCH"),
    ("DRK", "DASH"),
    ("BCHABC", "BCH"),
    ("BCHSV", "BSV"),
];

/// Common code for `code`, resolving well-known aliases.
///
/// ```
/// use unicex_core::base_exchange::common_currency_code;
///
/// assert_eq!(common_currency_code("XBT"), "BTC");
/// assert_eq!(common_currency_code("ETH"), "ETH");
/// ```
pub fn common_currency_code(code: &str) -> String {
    CURRENCY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map_or_else(|| code.to_string(), |(_, common)| (*common).to_string())
}

/// Indices over the loaded markets and currencies.
#[derive(Debug, Clone, Default)]
pub struct MarketRegistry {
    markets: HashMap<String, Arc<Market>>,
    markets_by_id: HashMap<String, Arc<Market>>,
    currencies: HashMap<String, Arc<Currency>>,
    currencies_by_id: HashMap<String, Arc<Currency>>,
    symbols: Vec<String>,
    ids: Vec<String>,
    codes: Vec<String>,
    loaded: bool,
}

impl MarketRegistry {
    /// An empty, unloaded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every index in one pass.
    ///
    /// Currencies are derived from the markets first, keeping the finest
    /// precision seen per code (first seen on ties), then `currencies` from
    /// a dedicated endpoint override them by code. A market id that repeats
    /// keeps its last record. When several ids share a unified symbol, the id
    /// that appears last in `markets` owns the symbol.
    pub fn set_markets(
        &mut self,
        markets: Vec<Market>,
        currencies: Option<Vec<Currency>>,
        precision_mode: PrecisionMode,
    ) -> &HashMap<String, Arc<Market>> {
        let mut by_id: HashMap<String, Arc<Market>> = HashMap::with_capacity(markets.len());
        let mut id_order = Vec::with_capacity(markets.len());
        for market in markets {
            if !by_id.contains_key(&market.id) {
                id_order.push(market.id.clone());
            }
            by_id.insert(market.id.clone(), Arc::new(market));
        }

        let mut derived: HashMap<String, Currency> = HashMap::new();
        let mut code_order = Vec::new();
        for id in &id_order {
            let Some(market) = by_id.get(id) else { continue };
            let sides = [
                (&market.base_id, &market.base, market.precision.base.or(market.precision.amount)),
                (&market.quote_id, &market.quote, market.precision.quote.or(market.precision.price)),
            ];
            for (currency_id, code, precision) in sides {
                if code.is_empty() {
                    continue;
                }
                let precision = precision.unwrap_or(match precision_mode {
                    PrecisionMode::TickSize => DEFAULT_CURRENCY_TICK,
                    _ => DEFAULT_CURRENCY_DIGITS,
                });
                let candidate = Currency::new(currency_id.clone(), code.clone(), Some(precision));
                match derived.entry(code.clone()) {
                    Entry::Vacant(slot) => {
                        code_order.push(code.clone());
                        slot.insert(candidate);
                    }
                    Entry::Occupied(mut slot) => {
                        if is_finer(precision, slot.get().precision, precision_mode) {
                            slot.insert(candidate);
                        }
                    }
                }
            }
        }

        for currency in currencies.into_iter().flatten() {
            if !derived.contains_key(&currency.code) {
                code_order.push(currency.code.clone());
            }
            derived.insert(currency.code.clone(), currency);
        }

        self.markets = id_order
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|m| (m.symbol.clone(), Arc::clone(m)))
            .collect();
        self.markets_by_id = by_id;
        self.currencies = code_order
            .iter()
            .filter_map(|code| derived.remove(code).map(|c| (code.clone(), Arc::new(c))))
            .collect();
        self.currencies_by_id = self
            .currencies
            .values()
            .map(|c| (c.id.clone(), Arc::clone(c)))
            .collect();

        self.symbols = self.markets.keys().cloned().collect();
        self.symbols.sort();
        self.ids = self.markets_by_id.keys().cloned().collect();
        self.ids.sort();
        self.codes = self.currencies.keys().cloned().collect();
        self.codes.sort();
        self.loaded = true;

        info!(
            markets = self.markets.len(),
            currencies = self.currencies.len(),
            "Markets indexed"
        );
        &self.markets
    }

    /// Whether `set_markets` has run.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Markets by unified symbol.
    pub fn markets(&self) -> &HashMap<String, Arc<Market>> {
        &self.markets
    }

    /// Markets by native id.
    pub fn markets_by_id(&self) -> &HashMap<String, Arc<Market>> {
        &self.markets_by_id
    }

    /// Currencies by unified code.
    pub fn currencies(&self) -> &HashMap<String, Arc<Currency>> {
        &self.currencies
    }

    /// Market for a unified symbol; `BadSymbol` when unknown.
    pub fn market(&self, symbol: &str) -> Result<Arc<Market>> {
        self.markets
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::bad_symbol(format!("Market {symbol} not found")))
    }

    /// Market for a native id.
    pub fn market_by_id(&self, id: &str) -> Option<Arc<Market>> {
        self.markets_by_id.get(id).cloned()
    }

    /// Currency for a unified code; `BadRequest` when unknown.
    pub fn currency(&self, code: &str) -> Result<Arc<Currency>> {
        self.currencies
            .get(code)
            .cloned()
            .ok_or_else(|| Error::bad_request(format!("Currency {code} not found")))
    }

    /// Currency for a native id.
    pub fn currency_by_id(&self, id: &str) -> Option<Arc<Currency>> {
        self.currencies_by_id.get(id).cloned()
    }

    /// Sorted unified symbols.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Sorted native market ids.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Sorted currency codes.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Unified code for a native currency id.
    pub fn safe_currency_code(&self, currency_id: &str) -> String {
        match self.currency_by_id(currency_id) {
            Some(currency) => currency.code.clone(),
            None => common_currency_code(&currency_id.to_uppercase()),
        }
    }
}

/// Whether `candidate` is strictly more precise than `current`.
fn is_finer(candidate: Decimal, current: Option<Decimal>, mode: PrecisionMode) -> bool {
    match current {
        None => true,
        Some(current) => match mode {
            PrecisionMode::TickSize => candidate < current,
            _ => candidate > current,
        },
    }
}
