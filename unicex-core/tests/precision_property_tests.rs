//! Property-based tests for the decimal precision formatter.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use unicex_core::precision::{PaddingMode, PrecisionMode, RoundingMode, decimal_to_precision};

// ============================================================================
// Test Generators
// ============================================================================

/// Decimals below 10^16 in magnitude with up to 12 fractional digits.
fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000_000_000i64..10_000_000_000_000_000i64, 0u32..=12)
        .prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn rounding_strategy() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![Just(RoundingMode::Round), Just(RoundingMode::Truncate)]
}

fn padding_strategy() -> impl Strategy<Value = PaddingMode> {
    prop_oneof![Just(PaddingMode::NoPadding), Just(PaddingMode::PadWithZero)]
}

/// Ticks such as 0.5, 0.01, 0.0025 or 5.
fn tick_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=25, 0u32..=8).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn fractional_digits(s: &str) -> usize {
    s.split_once('.').map_or(0, |(_, frac)| frac.len())
}

// ============================================================================
// Output shape
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn output_is_plain_decimal(
        value in decimal_strategy(),
        rounding in rounding_strategy(),
        padding in padding_strategy(),
        places in 0u32..=10,
    ) {
        for mode in [PrecisionMode::DecimalPlaces, PrecisionMode::SignificantDigits] {
            let s = decimal_to_precision(value, rounding, Some(Decimal::from(places)), mode, padding)
                .unwrap();
            prop_assert!(!s.contains('e') && !s.contains('E'), "exponent in {}", s);
            prop_assert!(Decimal::from_str(&s).is_ok(), "not a decimal: {}", s);
        }
    }

    #[test]
    fn decimal_places_bound_fraction(
        value in decimal_strategy(),
        rounding in rounding_strategy(),
        places in 0u32..=10,
    ) {
        let s = decimal_to_precision(
            value,
            rounding,
            Some(Decimal::from(places)),
            PrecisionMode::DecimalPlaces,
            PaddingMode::NoPadding,
        )
        .unwrap();
        prop_assert!(fractional_digits(&s) <= places as usize);

        let padded = decimal_to_precision(
            value,
            rounding,
            Some(Decimal::from(places)),
            PrecisionMode::DecimalPlaces,
            PaddingMode::PadWithZero,
        )
        .unwrap();
        if places > 0 {
            prop_assert_eq!(fractional_digits(&padded), places as usize);
        }
        prop_assert_eq!(Decimal::from_str(&s).unwrap(), Decimal::from_str(&padded).unwrap());
    }

    #[test]
    fn truncation_moves_toward_zero(value in decimal_strategy(), places in 0u32..=10) {
        let s = decimal_to_precision(
            value,
            RoundingMode::Truncate,
            Some(Decimal::from(places)),
            PrecisionMode::DecimalPlaces,
            PaddingMode::NoPadding,
        )
        .unwrap();
        let result = Decimal::from_str(&s).unwrap();
        prop_assert!(result.abs() <= value.abs());
    }

    #[test]
    fn ticks_land_on_the_grid(
        value in decimal_strategy(),
        tick in tick_strategy(),
        rounding in rounding_strategy(),
    ) {
        let s = decimal_to_precision(
            value,
            rounding,
            Some(tick),
            PrecisionMode::TickSize,
            PaddingMode::NoPadding,
        )
        .unwrap();
        let result = Decimal::from_str(&s).unwrap();
        prop_assert!((result % tick).is_zero(), "{} is not a multiple of {}", result, tick);
        prop_assert!((result - value).abs() < tick);
    }

    #[test]
    fn missing_precision_is_identity(value in decimal_strategy(), rounding in rounding_strategy()) {
        let s = decimal_to_precision(
            value,
            rounding,
            None,
            PrecisionMode::DecimalPlaces,
            PaddingMode::NoPadding,
        )
        .unwrap();
        prop_assert_eq!(Decimal::from_str(&s).unwrap(), value);
    }
}
