//! Balance type definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::parser_utils::safe_decimal;

/// Keys that sit beside the per-currency entries in a raw balance map.
pub const RESERVED_BALANCE_KEYS: [&str; 6] = ["info", "free", "used", "total", "timestamp", "datetime"];

/// Balance entry for a single currency
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    /// Available for trading
    pub free: Option<Decimal>,
    /// Locked in open orders
    pub used: Option<Decimal>,
    /// `free + used`
    pub total: Option<Decimal>,
}

impl BalanceEntry {
    /// Entry from free and used amounts. `total` stays `None` if the sum
    /// overflows.
    pub fn new(free: Decimal, used: Decimal) -> Self {
        Self {
            free: Some(free),
            used: Some(used),
            total: free.checked_add(used),
        }
    }

    /// Derives whichever of the three values is missing from the other two.
    /// A derivation that overflows leaves the value unknown.
    #[must_use]
    pub fn complete(mut self) -> Self {
        match (self.free, self.used, self.total) {
            (Some(free), Some(used), None) => self.total = free.checked_add(used),
            (Some(free), None, Some(total)) => self.used = total.checked_sub(free),
            (None, Some(used), Some(total)) => self.free = total.checked_sub(used),
            _ => {}
        }
        self
    }
}

/// Balances keyed by unified currency code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    /// Per-currency entries
    pub balances: BTreeMap<String, BalanceEntry>,
    /// Snapshot time in milliseconds
    pub timestamp: Option<i64>,
    /// The untouched source payload
    pub info: Value,
}

impl Balance {
    /// Folds a map of `code -> {free, used, total}` into a [`Balance`].
    ///
    /// Reserved keys are skipped, amounts may be strings or numbers, and the
    /// missing third value of each entry is derived.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use serde_json::json;
    /// use unicex_core::types::Balance;
    ///
    /// let raw = json!({
    ///     "info": {"whatever": 1},
    ///     "BTC": {"free": "0.5", "used": "0.25"},
    ///     "USDT": {"free": 100, "total": 150}
    /// });
    /// let balance = Balance::parse(&raw);
    /// assert_eq!(balance.get("BTC").unwrap().total, Some(dec!(0.75)));
    /// assert_eq!(balance.get("USDT").unwrap().used, Some(dec!(50)));
    /// assert!(balance.get("info").is_none());
    /// ```
    pub fn parse(raw: &Value) -> Self {
        let mut balance = Self {
            info: raw.get("info").cloned().unwrap_or(Value::Null),
            ..Self::default()
        };

        if let Some(map) = raw.as_object() {
            for (code, entry) in map {
                if RESERVED_BALANCE_KEYS.contains(&code.as_str()) || !entry.is_object() {
                    continue;
                }
                let parsed = BalanceEntry {
                    free: safe_decimal(entry, "free"),
                    used: safe_decimal(entry, "used"),
                    total: safe_decimal(entry, "total"),
                };
                balance.balances.insert(code.clone(), parsed.complete());
            }
        }
        balance
    }

    /// Get balance for a specific currency
    pub fn get(&self, currency: &str) -> Option<&BalanceEntry> {
        self.balances.get(currency)
    }

    /// Set balance for a currency
    pub fn set(&mut self, currency: impl Into<String>, entry: BalanceEntry) {
        self.balances.insert(currency.into(), entry.complete());
    }

    /// Free amounts by currency.
    pub fn free(&self) -> BTreeMap<&str, Decimal> {
        self.balances
            .iter()
            .filter_map(|(code, e)| e.free.map(|v| (code.as_str(), v)))
            .collect()
    }

    /// Total amounts by currency.
    pub fn total(&self) -> BTreeMap<&str, Decimal> {
        self.balances
            .iter()
            .filter_map(|(code, e)| e.total.map(|v| (code.as_str(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_reserved_keys_skipped() {
        let raw = json!({
            "free": {"BTC": 1},
            "used": {"BTC": 0},
            "total": {"BTC": 1},
            "timestamp": 1,
            "datetime": "x",
            "ETH": {"free": "2", "used": "1"}
        });
        let balance = Balance::parse(&raw);
        assert_eq!(balance.balances.len(), 1);
        assert_eq!(balance.get("ETH").unwrap().total, Some(dec!(3)));
    }

    #[test]
    fn test_complete_derives_free() {
        let entry = BalanceEntry {
            free: None,
            used: Some(dec!(1)),
            total: Some(dec!(5)),
        }
        .complete();
        assert_eq!(entry.free, Some(dec!(4)));
    }

    #[test]
    fn test_garbage_amounts_stay_unknown() {
        let raw = json!({"XRP": {"free": "n/a", "used": null}});
        let entry = *Balance::parse(&raw).get("XRP").unwrap();
        assert_eq!(entry, BalanceEntry::default());
    }

    #[test]
    fn test_overflowing_amounts_stay_unknown() {
        let raw = json!({
            "BTC": {"free": "79228162514264337593543950335", "used": "1"},
            "ETH": {"used": "-79228162514264337593543950335", "total": "1"}
        });
        let balance = Balance::parse(&raw);
        let btc = balance.get("BTC").unwrap();
        assert_eq!(btc.free, Some(Decimal::MAX));
        assert_eq!(btc.total, None);
        assert_eq!(balance.get("ETH").unwrap().free, None);

        let entry = BalanceEntry::new(Decimal::MAX, dec!(1));
        assert_eq!(entry.total, None);
    }

    #[test]
    fn test_free_and_total_views() {
        let mut balance = Balance::default();
        balance.set("BTC", BalanceEntry::new(dec!(1), dec!(2)));
        assert_eq!(balance.free()["BTC"], dec!(1));
        assert_eq!(balance.total()["BTC"], dec!(3));
    }
}
