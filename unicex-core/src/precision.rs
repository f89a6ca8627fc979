//! Exchange-acceptable numeric strings.
//!
//! Prices and amounts are rounded on [`Decimal`] so no binary floating-point
//! error leaks into the output, and the output never uses exponent notation.
//!
//! - Rounding modes: [`RoundingMode::Round`] (half away from zero) and
//!   [`RoundingMode::Truncate`] (toward zero)
//! - Precision modes: decimal places, significant digits, tick size
//! - Padding: keep or strip trailing zeros

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Rounding mode for precision calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Round to nearest, ties away from zero.
    #[default]
    Round,
    /// Drop excess digits (toward zero).
    Truncate,
}

/// How the `precision` argument is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PrecisionMode {
    /// `precision` counts digits after the decimal point.
    #[default]
    DecimalPlaces,
    /// `precision` counts significant digits.
    SignificantDigits,
    /// `precision` is the step itself, e.g. `0.0001`.
    TickSize,
}

/// Output padding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Strip trailing zeros.
    #[default]
    NoPadding,
    /// Pad with zeros to the target precision.
    PadWithZero,
}

/// Largest scale a `Decimal` can carry.
const MAX_SCALE: u32 = 28;

/// Formats `value` according to an exchange's precision rules.
///
/// A missing or negative `precision` returns the full, unrounded value.
/// In [`PrecisionMode::TickSize`] the precision is the step; in the other
/// modes it must be a whole number of digits.
///
/// # Errors
///
/// Returns `InternalError` for a fractional digit count, a non-positive tick
/// size or an arithmetic overflow. These indicate bad market metadata or an
/// adapter bug rather than a runtime condition.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use unicex_core::precision::{decimal_to_precision, PaddingMode, PrecisionMode, RoundingMode};
///
/// let s = decimal_to_precision(
///     dec!(0.123456),
///     RoundingMode::Truncate,
///     Some(dec!(4)),
///     PrecisionMode::DecimalPlaces,
///     PaddingMode::NoPadding,
/// )
/// .unwrap();
/// assert_eq!(s, "0.1234");
///
/// let s = decimal_to_precision(
///     dec!(123.456),
///     RoundingMode::Round,
///     Some(dec!(0.05)),
///     PrecisionMode::TickSize,
///     PaddingMode::NoPadding,
/// )
/// .unwrap();
/// assert_eq!(s, "123.45");
/// ```
pub fn decimal_to_precision(
    value: Decimal,
    rounding_mode: RoundingMode,
    precision: Option<Decimal>,
    precision_mode: PrecisionMode,
    padding_mode: PaddingMode,
) -> Result<String> {
    let precision = match precision {
        Some(p) if !p.is_sign_negative() => p,
        _ => return Ok(plain(value)),
    };

    match precision_mode {
        PrecisionMode::TickSize => to_tick_size(value, rounding_mode, precision, padding_mode),
        PrecisionMode::DecimalPlaces => {
            let places = digit_count(precision)?;
            let rounded = round_places(value, places, rounding_mode);
            Ok(pad(rounded, places, padding_mode))
        }
        PrecisionMode::SignificantDigits => {
            let digits = digit_count(precision)?;
            to_significant_digits(value, rounding_mode, digits, padding_mode)
        }
    }
}

/// Float front-end for [`decimal_to_precision`].
///
/// The float is first rendered through its shortest round-trip
/// representation so `0.1` stays `0.1` instead of `0.1000000000000000055`.
///
/// # Errors
///
/// Returns `BadRequest` for non-finite or out-of-range inputs, and anything
/// [`decimal_to_precision`] returns.
pub fn float_to_precision(
    value: f64,
    rounding_mode: RoundingMode,
    precision: Option<Decimal>,
    precision_mode: PrecisionMode,
    padding_mode: PaddingMode,
) -> Result<String> {
    let decimal = decimal_from_f64(value)
        .ok_or_else(|| Error::bad_request(format!("Cannot format non-decimal number {value}")))?;
    decimal_to_precision(decimal, rounding_mode, precision, precision_mode, padding_mode)
}

/// Renders a float without exponent notation and with no trailing zeros.
///
/// ```
/// use unicex_core::precision::number_to_string;
///
/// assert_eq!(number_to_string(1e-8), "0.00000001");
/// assert_eq!(number_to_string(1.5e21), "1500000000000000000000");
/// assert_eq!(number_to_string(2.0), "2");
/// assert_eq!(number_to_string(-0.0), "0");
/// ```
pub fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Converts a float to `Decimal` via its shortest decimal representation.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let s = number_to_string(value);
    Decimal::from_str(&s)
        .ok()
        .or_else(|| rust_decimal::prelude::FromPrimitive::from_f64(value))
}

/// Number of decimal places implied by a step or precision string.
///
/// ```
/// use unicex_core::precision::precision_from_string;
///
/// assert_eq!(precision_from_string("0.001"), 3);
/// assert_eq!(precision_from_string("0.0100"), 2);
/// assert_eq!(precision_from_string("100"), 0);
/// assert_eq!(precision_from_string("1e-8"), 8);
/// ```
pub fn precision_from_string(s: &str) -> i32 {
    if let Some(e_pos) = s.find(['e', 'E']) {
        if let Ok(exp) = s[e_pos + 1..].parse::<i32>() {
            return -exp;
        }
    }

    let trimmed = s.trim_end_matches('0');
    match trimmed.find('.') {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        Some(dot_pos) => (trimmed.len() - dot_pos - 1) as i32,
        None => 0,
    }
}

/// Full decimal string with trailing zeros stripped.
fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

fn digit_count(precision: Decimal) -> Result<u32> {
    if !precision.fract().is_zero() {
        return Err(Error::internal(format!(
            "Digit precision must be a whole number, got {precision}"
        )));
    }
    precision
        .to_u32()
        .ok_or_else(|| Error::internal(format!("Digit precision out of range: {precision}")))
}

fn strategy(mode: RoundingMode) -> RoundingStrategy {
    match mode {
        RoundingMode::Round => RoundingStrategy::MidpointAwayFromZero,
        RoundingMode::Truncate => RoundingStrategy::ToZero,
    }
}

fn round_places(value: Decimal, places: u32, mode: RoundingMode) -> Decimal {
    value.round_dp_with_strategy(places.min(MAX_SCALE), strategy(mode))
}

fn to_tick_size(
    value: Decimal,
    rounding_mode: RoundingMode,
    tick: Decimal,
    padding_mode: PaddingMode,
) -> Result<String> {
    if tick.is_zero() {
        return Err(Error::internal("Tick size must be positive"));
    }

    let ticks = value
        .checked_div(tick)
        .ok_or_else(|| Error::internal(format!("Overflow dividing {value} by tick {tick}")))?;
    let whole = ticks.round_dp_with_strategy(0, strategy(rounding_mode));
    let result = whole
        .checked_mul(tick)
        .ok_or_else(|| Error::internal(format!("Overflow scaling {whole} ticks of {tick}")))?;

    Ok(pad(result, tick.normalize().scale(), padding_mode))
}

fn to_significant_digits(
    value: Decimal,
    rounding_mode: RoundingMode,
    digits: u32,
    padding_mode: PaddingMode,
) -> Result<String> {
    if value.is_zero() || digits == 0 {
        return Ok("0".to_string());
    }

    let magnitude = magnitude(value);
    let places = i64::from(digits) - i64::from(magnitude) - 1;

    if places >= 0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let places = places.min(i64::from(MAX_SCALE)) as u32;
        let rounded = round_places(value, places, rounding_mode);
        return Ok(pad(rounded, places, padding_mode));
    }

    // Rounding left of the decimal point: scale down, round, scale back.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let shift = (-places).min(i64::from(MAX_SCALE)) as u32;
    let factor = Decimal::from_i128_with_scale(10_i128.pow(shift), 0);
    let scaled = value
        .checked_div(factor)
        .ok_or_else(|| Error::internal(format!("Overflow scaling {value}")))?;
    let rounded = scaled.round_dp_with_strategy(0, strategy(rounding_mode));
    let result = rounded
        .checked_mul(factor)
        .ok_or_else(|| Error::internal(format!("Overflow scaling {value}")))?;
    Ok(plain(result))
}

/// Power of ten of the most significant digit: 123.4 -> 2, 0.0012 -> -3.
fn magnitude(value: Decimal) -> i32 {
    let s = value.abs().normalize().to_string();
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let int_part = int_part.trim_start_matches('0');
    if int_part.is_empty() {
        let zeros = frac_part.len() - frac_part.trim_start_matches('0').len();
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let zeros = zeros as i32;
        -(zeros + 1)
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let len = int_part.len() as i32;
        len - 1
    }
}

fn pad(value: Decimal, places: u32, padding_mode: PaddingMode) -> String {
    let mut s = plain(value);
    if padding_mode == PaddingMode::NoPadding || places == 0 {
        return s;
    }

    let current = s.split_once('.').map_or(0, |(_, frac)| frac.len());
    let wanted = places as usize;
    if current < wanted {
        if current == 0 {
            s.push('.');
        }
        s.extend(std::iter::repeat_n('0', wanted - current));
    }
    s
}
