//! Time helpers.
//!
//! All timestamps are `i64` milliseconds since the Unix epoch, in UTC.
//!
//! ```rust
//! use unicex_core::time::{iso8601, parse8601};
//!
//! let iso = iso8601(1_704_110_400_000).unwrap();
//! assert_eq!(iso, "2024-01-01T12:00:00.000Z");
//! assert_eq!(parse8601(&iso), Some(1_704_110_400_000));
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Current time in milliseconds.
#[inline]
pub fn milliseconds() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time in seconds.
#[inline]
pub fn seconds() -> i64 {
    Utc::now().timestamp()
}

/// Renders a millisecond timestamp as `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn iso8601(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parses an ISO 8601 / RFC 3339 string into milliseconds.
///
/// Accepts an explicit offset, a trailing `Z`, or no zone at all (taken as
/// UTC), with or without fractional seconds and with `T` or a space between
/// date and time.
pub fn parse8601(datetime: &str) -> Option<i64> {
    let datetime = datetime.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime) {
        return Some(dt.timestamp_millis());
    }

    let naive = datetime.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_sane() {
        let ms = milliseconds();
        let s = seconds();
        assert!(ms > 1_600_000_000_000);
        assert!((ms / 1000 - s).abs() <= 1);
    }

    #[test]
    fn test_iso8601_keeps_millis() {
        assert_eq!(iso8601(0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(
            iso8601(1_499_827_319_559).as_deref(),
            Some("2017-07-12T02:41:59.559Z")
        );
        assert_eq!(iso8601(i64::MAX), None);
    }

    #[test]
    fn test_parse8601_variants() {
        assert_eq!(parse8601("2024-01-01T12:00:00Z"), Some(1_704_110_400_000));
        assert_eq!(parse8601("2024-01-01T14:00:00+02:00"), Some(1_704_110_400_000));
        assert_eq!(parse8601("2024-01-01 12:00:00.250"), Some(1_704_110_400_250));
        assert_eq!(parse8601("2024-01-01T12:00:00"), Some(1_704_110_400_000));
        assert_eq!(parse8601("yesterday"), None);
        assert_eq!(parse8601(""), None);
    }
}
