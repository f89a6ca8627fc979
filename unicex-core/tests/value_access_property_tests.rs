//! Property-based tests for the tolerant JSON getters.
//!
//! Adapters feed whatever an exchange returns straight into these helpers,
//! so they must never panic and must agree with each other on what a
//! well-formed value is.

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use unicex_core::parser_utils::{
    safe_bool, safe_decimal, safe_float, safe_integer, safe_string, safe_string_lower,
    safe_value, safe_value_or, value_to_string,
};

// ============================================================================
// Test Generators
// ============================================================================

/// Arbitrary JSON up to a few levels deep.
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        "[a-zA-Z0-9.\\-e ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

// ============================================================================
// Never panic
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn getters_never_panic_on_keys(node in json_strategy(), key in key_strategy()) {
        let _ = safe_value(&node, key.as_str());
        let _ = safe_string(&node, key.as_str());
        let _ = safe_string_lower(&node, key.as_str());
        let _ = safe_float(&node, key.as_str());
        let _ = safe_integer(&node, key.as_str());
        let _ = safe_decimal(&node, key.as_str());
        let _ = safe_bool(&node, key.as_str());
    }

    #[test]
    fn getters_never_panic_on_indices(node in json_strategy(), index in 0usize..10) {
        let _ = safe_value(&node, index);
        let _ = safe_string(&node, index);
        let _ = safe_float(&node, index);
        let _ = safe_integer(&node, index);
        let _ = safe_decimal(&node, index);
    }

    #[test]
    fn default_only_when_absent(node in json_strategy(), key in key_strategy()) {
        let fallback = json!("fallback");
        let found = safe_value(&node, key.as_str());
        let with_default = safe_value_or(&node, key.as_str(), &fallback);
        match found {
            Some(value) => prop_assert_eq!(with_default, value),
            None => prop_assert_eq!(with_default, &fallback),
        }
    }

    #[test]
    fn null_reads_as_absent(key in key_strategy()) {
        let node = json!({ key.clone(): null });
        prop_assert!(safe_value(&node, key.as_str()).is_none());
        prop_assert!(safe_string(&node, key.as_str()).is_none());
    }

    #[test]
    fn containers_are_not_scalars(node in json_strategy()) {
        if node.is_object() || node.is_array() {
            prop_assert!(value_to_string(&node).is_none());
        }
    }
}

// ============================================================================
// Numeric agreement
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn integers_read_the_same_as_number_or_string(n in any::<i64>()) {
        let node = json!({"num": n, "text": n.to_string()});
        prop_assert_eq!(safe_integer(&node, "num"), Some(n));
        prop_assert_eq!(safe_integer(&node, "text"), Some(n));
        prop_assert_eq!(safe_string(&node, "num"), Some(n.to_string()));
        prop_assert_eq!(safe_decimal(&node, "text"), Some(Decimal::from(n)));
    }

    #[test]
    fn decimal_strings_keep_their_digits(units in -1_000_000_000i64..1_000_000_000, scale in 0u32..10) {
        let value = Decimal::new(units, scale);
        let node = json!([value.to_string()]);
        prop_assert_eq!(safe_decimal(&node, 0), Some(value));
    }

    #[test]
    fn garbage_strings_are_not_numbers(text in "[g-z]{1,8}") {
        let node = json!({"v": text});
        prop_assert!(safe_float(&node, "v").is_none());
        prop_assert!(safe_integer(&node, "v").is_none());
        prop_assert!(safe_decimal(&node, "v").is_none());
    }
}
