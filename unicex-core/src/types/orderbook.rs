//! Order book snapshot and the generic parser that builds it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::Index;

use crate::parser_utils::{safe_decimal, safe_value};
use crate::time::iso8601;

/// One price level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderBookEntry {
    /// Price level
    pub price: Decimal,
    /// Total amount at this price level
    pub amount: Decimal,
}

impl OrderBookEntry {
    /// Create a new order book entry
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }
}

/// Order book side (bids or asks)
pub type OrderBookSide = Vec<OrderBookEntry>;

/// A single snapshot. Recreated on every fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderBook {
    /// Unified symbol
    pub symbol: String,
    /// Snapshot time in milliseconds
    pub timestamp: Option<i64>,
    /// ISO8601 rendering of `timestamp`
    pub datetime: Option<String>,
    /// Exchange sequence number for gap detection
    pub nonce: Option<i64>,
    /// Bid side, descending by price
    pub bids: OrderBookSide,
    /// Ask side, ascending by price
    pub asks: OrderBookSide,
}

impl OrderBook {
    /// Get best bid (highest buy price)
    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.first()
    }

    /// Get best ask (lowest sell price)
    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.first()
    }

    /// Calculate bid-ask spread; `None` if the difference overflows
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask.price.checked_sub(bid.price),
            _ => None,
        }
    }

    /// Keeps at most `depth` levels per side.
    #[must_use]
    pub fn limit(mut self, depth: usize) -> Self {
        self.bids.truncate(depth);
        self.asks.truncate(depth);
        self
    }
}

/// Builds an [`OrderBook`] from a raw payload.
///
/// `bids_key`/`asks_key` locate the two sides in `raw`. Each level is a small
/// list or map; `price_key`/`amount_key` select the fields holding price and
/// amount, as indices (`0`, `1`) or names (`"px"`, `"sz"`). Levels whose
/// price or amount cannot be read are dropped. Bids come back sorted
/// descending and asks ascending; equal prices keep their original order.
///
/// ```
/// use rust_decimal_macros::dec;
/// use serde_json::json;
/// use unicex_core::types::parse_order_book;
///
/// let raw = json!({"bids": [["100", "1"], ["110", "0.5"]], "asks": [[101, 1], [99, 2]]});
/// let book = parse_order_book(&raw, "BTC/USDT", None, "bids", "asks", 0, 1);
/// assert_eq!(book.bids[0].price, dec!(110));
/// assert_eq!(book.asks[0].price, dec!(99));
/// ```
pub fn parse_order_book<K: Index + Copy>(
    raw: &Value,
    symbol: &str,
    timestamp: Option<i64>,
    bids_key: &str,
    asks_key: &str,
    price_key: K,
    amount_key: K,
) -> OrderBook {
    let mut bids = parse_side(safe_value(raw, bids_key), price_key, amount_key);
    let mut asks = parse_side(safe_value(raw, asks_key), price_key, amount_key);

    // sort_by is stable, which keeps equal prices in arrival order
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    OrderBook {
        symbol: symbol.to_string(),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        nonce: None,
        bids,
        asks,
    }
}

fn parse_side<K: Index + Copy>(side: Option<&Value>, price_key: K, amount_key: K) -> OrderBookSide {
    let Some(Value::Array(levels)) = side else {
        return Vec::new();
    };

    levels
        .iter()
        .filter_map(|level| {
            let price = safe_decimal(level, price_key)?;
            let amount = safe_decimal(level, amount_key)?;
            Some(OrderBookEntry::new(price, amount))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn prices(side: &OrderBookSide) -> Vec<Decimal> {
        side.iter().map(|e| e.price).collect()
    }

    #[test]
    fn test_sorts_both_sides() {
        let raw = json!({
            "bids": [[100, 1], [95, 2], [110, 0.5]],
            "asks": [[101, 1], [99, 2]]
        });
        let book = parse_order_book(&raw, "BTC/USDT", Some(1_700_000_000_000), "bids", "asks", 0, 1);

        assert_eq!(
            book.bids,
            vec![
                OrderBookEntry::new(dec!(110), dec!(0.5)),
                OrderBookEntry::new(dec!(100), dec!(1)),
                OrderBookEntry::new(dec!(95), dec!(2)),
            ]
        );
        assert_eq!(prices(&book.asks), vec![dec!(99), dec!(101)]);
        assert_eq!(book.datetime.as_deref(), Some("2023-11-14T22:13:20.000Z"));
    }

    #[test]
    fn test_amount_first_layout() {
        let raw = json!({"b": [["2", "100"]], "a": [["3", "101"]]});
        let book = parse_order_book(&raw, "X/Y", None, "b", "a", 1, 0);
        assert_eq!(book.bids[0], OrderBookEntry::new(dec!(100), dec!(2)));
        assert_eq!(book.asks[0], OrderBookEntry::new(dec!(101), dec!(3)));
    }

    #[test]
    fn test_object_levels() {
        let raw = json!({
            "bids": [{"px": "10", "sz": "1"}, {"px": "12", "sz": "3"}],
            "asks": []
        });
        let book = parse_order_book(&raw, "X/Y", None, "bids", "asks", "px", "sz");
        assert_eq!(prices(&book.bids), vec![dec!(12), dec!(10)]);
        assert!(book.asks.is_empty());
    }

    #[test]
    fn test_malformed_levels_are_dropped() {
        let raw = json!({
            "bids": [["abc", "1"], ["100"], null, "x", ["99", "2"]],
            "asks": {"not": "a list"}
        });
        let book = parse_order_book(&raw, "X/Y", None, "bids", "asks", 0, 1);
        assert_eq!(book.bids, vec![OrderBookEntry::new(dec!(99), dec!(2))]);
        assert!(book.asks.is_empty());

        let empty = parse_order_book(&json!(null), "X/Y", None, "bids", "asks", 0, 1);
        assert!(empty.bids.is_empty() && empty.asks.is_empty());
    }

    #[test]
    fn test_equal_prices_keep_arrival_order() {
        let raw = json!({"bids": [[100, 1], [100, 2], [101, 3]], "asks": []});
        let book = parse_order_book(&raw, "X/Y", None, "bids", "asks", 0, 1);
        let amounts: Vec<Decimal> = book.bids.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(3), dec!(1), dec!(2)]);
    }

    #[test]
    fn test_limit_and_spread() {
        let raw = json!({"bids": [[3, 1], [2, 1], [1, 1]], "asks": [[4, 1], [5, 1]]});
        let book = parse_order_book(&raw, "X/Y", None, "bids", "asks", 0, 1).limit(1);
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.asks.len(), 1);
        assert_eq!(book.spread(), Some(dec!(1)));
    }

    #[test]
    fn test_spread_overflow_is_unknown() {
        let raw = json!({
            "bids": [["-79228162514264337593543950335", "1"]],
            "asks": [["79228162514264337593543950335", "1"]]
        });
        let book = parse_order_book(&raw, "X/Y", None, "bids", "asks", 0, 1);
        assert_eq!(book.spread(), None);
    }
}
