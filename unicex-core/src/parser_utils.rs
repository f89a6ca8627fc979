//! Safe, coercing accessors over loosely-structured exchange JSON.
//!
//! Every reader in the crate goes through these helpers. They never panic:
//! a missing key, a wrong shape or an unparsable string yields `None` (or the
//! caller's default in the `_or` forms). Numeric getters accept integers,
//! floats and string-encoded numbers interchangeably.
//!
//! Keys are anything `serde_json` can index with: `&str` for maps and
//! `usize` for lists.
//!
//! ```rust
//! use serde_json::json;
//! use unicex_core::parser_utils::{safe_float_or, safe_integer, safe_string};
//!
//! let raw = json!({"px": "42.5", "qty": 3, "side": "buy", "levels": [[1, 2]]});
//! assert_eq!(safe_float_or(&raw, "px", 0.0), 42.5);
//! assert_eq!(safe_integer(&raw, "qty"), Some(3));
//! assert_eq!(safe_string(&raw, "qty").as_deref(), Some("3"));
//! assert_eq!(safe_float_or(&raw, "side", 0.0), 0.0);
//! assert_eq!(safe_integer(&raw["levels"][0], 1), Some(2));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde_json::value::Index;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use crate::precision::number_to_string;

// ============================================================================
// Single-key getters
// ============================================================================

/// Returns the value at `key` unless it is absent or `null`.
pub fn safe_value<I: Index>(node: &Value, key: I) -> Option<&Value> {
    node.get(key).filter(|v| !v.is_null())
}

/// Returns the value at `key`, or `default` when absent or `null`.
pub fn safe_value_or<'a, I: Index>(node: &'a Value, key: I, default: &'a Value) -> &'a Value {
    safe_value(node, key).unwrap_or(default)
}

/// Reads a string. Numbers and booleans are stringified; containers are not.
pub fn safe_string<I: Index>(node: &Value, key: I) -> Option<String> {
    safe_value(node, key).and_then(value_to_string)
}

/// [`safe_string`] with a default.
pub fn safe_string_or<I: Index>(node: &Value, key: I, default: &str) -> String {
    safe_string(node, key).unwrap_or_else(|| default.to_string())
}

/// [`safe_string`] lower-cased.
pub fn safe_string_lower<I: Index>(node: &Value, key: I) -> Option<String> {
    safe_string(node, key).map(|s| s.to_lowercase())
}

/// [`safe_string`] upper-cased.
pub fn safe_string_upper<I: Index>(node: &Value, key: I) -> Option<String> {
    safe_string(node, key).map(|s| s.to_uppercase())
}

/// Reads a finite float from a number or a numeric string.
pub fn safe_float<I: Index>(node: &Value, key: I) -> Option<f64> {
    safe_value(node, key).and_then(value_to_f64)
}

/// [`safe_float`] with a default.
pub fn safe_float_or<I: Index>(node: &Value, key: I, default: f64) -> f64 {
    safe_float(node, key).unwrap_or(default)
}

/// Reads an integer. Fractional inputs are truncated toward zero.
pub fn safe_integer<I: Index>(node: &Value, key: I) -> Option<i64> {
    safe_value(node, key).and_then(value_to_i64)
}

/// [`safe_integer`] with a default.
pub fn safe_integer_or<I: Index>(node: &Value, key: I, default: i64) -> i64 {
    safe_integer(node, key).unwrap_or(default)
}

/// Reads an exact decimal from a number or a numeric string.
///
/// String inputs keep every digit the exchange sent, which is why prices and
/// amounts are read through this rather than [`safe_float`].
pub fn safe_decimal<I: Index>(node: &Value, key: I) -> Option<Decimal> {
    safe_value(node, key).and_then(value_to_decimal)
}

/// Reads a boolean from `true`/`false` or their string spellings.
pub fn safe_bool<I: Index>(node: &Value, key: I) -> Option<bool> {
    match safe_value(node, key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

// ============================================================================
// Two-key getters: primary key first, then the fallback
// ============================================================================

/// [`safe_value`] trying `key1`, then `key2`.
pub fn safe_value2<'a, I: Index, J: Index>(node: &'a Value, key1: I, key2: J) -> Option<&'a Value> {
    safe_value(node, key1).or_else(|| safe_value(node, key2))
}

/// [`safe_string`] trying `key1`, then `key2`.
pub fn safe_string2<I: Index, J: Index>(node: &Value, key1: I, key2: J) -> Option<String> {
    safe_string(node, key1).or_else(|| safe_string(node, key2))
}

/// [`safe_float`] trying `key1`, then `key2`.
pub fn safe_float2<I: Index, J: Index>(node: &Value, key1: I, key2: J) -> Option<f64> {
    safe_float(node, key1).or_else(|| safe_float(node, key2))
}

/// [`safe_integer`] trying `key1`, then `key2`.
pub fn safe_integer2<I: Index, J: Index>(node: &Value, key1: I, key2: J) -> Option<i64> {
    safe_integer(node, key1).or_else(|| safe_integer(node, key2))
}

/// [`safe_decimal`] trying `key1`, then `key2`.
pub fn safe_decimal2<I: Index, J: Index>(node: &Value, key1: I, key2: J) -> Option<Decimal> {
    safe_decimal(node, key1).or_else(|| safe_decimal(node, key2))
}

// ============================================================================
// Shape helpers
// ============================================================================

/// Number of entries in a list or map; zero for everything else.
pub fn length(node: &Value) -> usize {
    match node {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Builds a map of records keyed by the string value of each record's `key`.
///
/// Accepts a list of records or a map whose values are records. Records
/// without the key are skipped; when two records share a key the later one
/// wins.
///
/// ```rust
/// use serde_json::json;
/// use unicex_core::parser_utils::index_by;
///
/// let filters = json!([
///     {"filterType": "PRICE_FILTER", "tickSize": "0.01"},
///     {"filterType": "LOT_SIZE", "stepSize": "0.001"},
///     {"stepSize": "ignored"}
/// ]);
/// let by_type = index_by(&filters, "filterType");
/// assert_eq!(by_type.len(), 2);
/// assert_eq!(by_type["LOT_SIZE"]["stepSize"], "0.001");
/// ```
pub fn index_by(records: &Value, key: &str) -> Map<String, Value> {
    let items: Box<dyn Iterator<Item = &Value>> = match records {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    };

    let mut result = Map::new();
    for record in items {
        if let Some(id) = safe_string(record, key) {
            result.insert(id, record.clone());
        }
    }
    result
}

/// Truthiness: `null`, `false`, zero, the empty string and empty containers
/// are false; everything else is true.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Shallow merge of two maps; keys in `overrides` win. Non-map inputs are
/// treated as empty.
pub fn extend(base: &Value, overrides: &Value) -> Value {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    if let Some(extra) = overrides.as_object() {
        for (k, v) in extra {
            merged.insert(k.clone(), v.clone());
        }
    }
    Value::Object(merged)
}

/// Copy of a map without the given keys. Non-map inputs yield an empty map.
pub fn omit(node: &Value, keys: &[&str]) -> Value {
    let mut map = node.as_object().cloned().unwrap_or_default();
    for key in keys {
        map.remove(*key);
    }
    Value::Object(map)
}

// ============================================================================
// Scalar coercions
// ============================================================================

/// Stringifies a scalar. Floats never use exponent notation.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_repr(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerces a number or numeric string to a finite `f64`.
pub fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Coerces a number or numeric string to `i64`, truncating fractions.
pub fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(f64_to_i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(f64_to_i64))
        }
        _ => None,
    }
}

/// Coerces a number or numeric string to an exact `Decimal`.
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            parse_decimal_str(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64))
        }
        Value::String(s) => parse_decimal_str(s.trim()),
        _ => None,
    }
}

/// Parses plain or exponent notation; empty strings are `None`.
pub fn parse_decimal_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

fn f64_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() {
        f.trunc().to_i64()
    } else {
        None
    }
}

fn number_repr(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        n.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), number_to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_safe_float_falls_back_on_garbage() {
        let data = json!({"x": "abc", "y": "", "z": [1], "n": null});
        assert_eq!(safe_float_or(&data, "x", 0.0), 0.0);
        assert_eq!(safe_float_or(&data, "y", 1.5), 1.5);
        assert_eq!(safe_float_or(&data, "z", 2.0), 2.0);
        assert_eq!(safe_float_or(&data, "n", 3.0), 3.0);
        assert_eq!(safe_float_or(&data, "missing", 4.0), 4.0);
    }

    #[test]
    fn test_safe_float_rejects_non_finite_strings() {
        let data = json!({"a": "NaN", "b": "inf", "c": " 12.5 "});
        assert_eq!(safe_float(&data, "a"), None);
        assert_eq!(safe_float(&data, "b"), None);
        assert_eq!(safe_float(&data, "c"), Some(12.5));
    }

    #[test]
    fn test_numeric_encodings_are_interchangeable() {
        let data = json!({"s": "7", "i": 7, "f": 7.0});
        assert_eq!(safe_integer(&data, "s"), Some(7));
        assert_eq!(safe_integer(&data, "i"), Some(7));
        assert_eq!(safe_integer(&data, "f"), Some(7));
        assert_eq!(safe_float(&data, "s"), Some(7.0));
        assert_eq!(safe_float(&data, "i"), Some(7.0));
    }

    #[test]
    fn test_safe_integer_truncates() {
        let data = json!({"a": 12.9, "b": "-3.7", "c": "1e3"});
        assert_eq!(safe_integer(&data, "a"), Some(12));
        assert_eq!(safe_integer(&data, "b"), Some(-3));
        assert_eq!(safe_integer(&data, "c"), Some(1000));
        assert_eq!(safe_integer_or(&data, "missing", -1), -1);
    }

    #[test]
    fn test_safe_string_stringifies_scalars_only() {
        let data = json!({"n": 42, "f": 0.00000001, "b": true, "o": {}, "a": []});
        assert_eq!(safe_string(&data, "n").as_deref(), Some("42"));
        assert_eq!(safe_string(&data, "f").as_deref(), Some("0.00000001"));
        assert_eq!(safe_string(&data, "b").as_deref(), Some("true"));
        assert_eq!(safe_string(&data, "o"), None);
        assert_eq!(safe_string(&data, "a"), None);
        assert_eq!(safe_string_or(&data, "missing", "dflt"), "dflt");
    }

    #[test]
    fn test_safe_decimal_keeps_string_digits() {
        let data = json!({"p": "0.10000000", "q": 3, "e": "1.5e-7", "bad": "x"});
        assert_eq!(safe_decimal(&data, "p"), Some(dec!(0.10000000)));
        assert_eq!(safe_decimal(&data, "q"), Some(dec!(3)));
        assert_eq!(safe_decimal(&data, "e"), Some(dec!(0.00000015)));
        assert_eq!(safe_decimal(&data, "bad"), None);
    }

    #[test]
    fn test_index_keys_on_lists() {
        let data = json!([["100.5", "2"], "x"]);
        assert_eq!(safe_float(&data[0], 0), Some(100.5));
        assert_eq!(safe_float(&data[0], 5), None);
        assert_eq!(safe_float(&data, "key"), None);
        assert_eq!(safe_float(&data[1], 0), None);
    }

    #[test]
    fn test_two_key_variants() {
        let data = json!({"cumQuote": "15.5", "status": null, "state": "live"});
        assert_eq!(safe_float2(&data, "cummulativeQuoteQty", "cumQuote"), Some(15.5));
        assert_eq!(safe_string2(&data, "status", "state").as_deref(), Some("live"));
        assert_eq!(safe_integer2(&data, "a", "b"), None);
        assert!(safe_value2(&data, "state", "status").is_some());
    }

    #[test]
    fn test_safe_bool() {
        let data = json!({"a": true, "b": "FALSE", "c": 1});
        assert_eq!(safe_bool(&data, "a"), Some(true));
        assert_eq!(safe_bool(&data, "b"), Some(false));
        assert_eq!(safe_bool(&data, "c"), None);
    }

    #[test]
    fn test_to_bool() {
        assert!(!to_bool(&json!(null)));
        assert!(!to_bool(&json!("")));
        assert!(!to_bool(&json!(0)));
        assert!(!to_bool(&json!(0.0)));
        assert!(!to_bool(&json!([])));
        assert!(!to_bool(&json!({})));
        assert!(!to_bool(&json!(false)));
        assert!(to_bool(&json!("0")));
        assert!(to_bool(&json!(-1)));
        assert!(to_bool(&json!([0])));
        assert!(to_bool(&json!({"a": null})));
    }

    #[test]
    fn test_length() {
        assert_eq!(length(&json!([1, 2, 3])), 3);
        assert_eq!(length(&json!({"a": 1})), 1);
        assert_eq!(length(&json!("abc")), 0);
        assert_eq!(length(&json!(null)), 0);
    }

    #[test]
    fn test_index_by_map_of_records() {
        let data = json!({
            "x": {"ccy": "BTC", "v": 1},
            "y": {"ccy": "BTC", "v": 2},
            "z": {"ccy": "ETH", "v": 3}
        });
        let indexed = index_by(&data, "ccy");
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed["BTC"]["v"], 2);
        assert!(index_by(&json!("nope"), "ccy").is_empty());
    }

    #[test]
    fn test_extend_and_omit() {
        let base = json!({"symbol": "BTCUSDT", "limit": 5});
        let merged = extend(&base, &json!({"limit": 10, "type": "spot"}));
        assert_eq!(merged, json!({"symbol": "BTCUSDT", "limit": 10, "type": "spot"}));

        let trimmed = omit(&merged, &["type", "absent"]);
        assert_eq!(trimmed, json!({"symbol": "BTCUSDT", "limit": 10}));
        assert_eq!(omit(&json!(5), &["a"]), json!({}));
    }
}
