//! Response classification
//!
//! Turns a received response into `Ok(())` or a classified [`Error`](crate::error::Error). The
//! stages run in a fixed order and the first one that produces a kind wins:
//!
//! 1. exact match of the body's error code, then of its error message
//! 2. broad (substring) match of the error message, in declaration order
//! 3. infrastructure phrases in non-JSON bodies (CDN challenge pages,
//!    maintenance banners), even on a 2xx status
//! 4. the HTTP status table
//! 5. any remaining non-2xx status becomes a plain `ExchangeError`
//!
//! The adapter's own `handle_errors` hook runs before all of these; see
//! [`crate::adapter::ExchangeAdapter::handle_errors`].

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::warn;

use crate::error::{ClassifiedError, ErrorKind, Result, truncate_message};
use crate::http_client::HttpResponse;
use crate::parser_utils::{safe_string, safe_string2, safe_value};

/// Per-exchange code and message tables.
///
/// ```
/// use unicex_core::classifier::ExceptionTable;
/// use unicex_core::error::ErrorKind;
///
/// let table = ExceptionTable::new()
///     .exact("-2011", ErrorKind::OrderNotFound)
///     .broad("overloaded", ErrorKind::ExchangeNotAvailable);
/// assert_eq!(table.find_exact("-2011"), Some(ErrorKind::OrderNotFound));
/// assert_eq!(table.find_broad("system overloaded, retry"), Some(ErrorKind::ExchangeNotAvailable));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExceptionTable {
    exact: HashMap<String, ErrorKind>,
    broad: Vec<(String, ErrorKind)>,
}

impl ExceptionTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a full code or message match.
    #[must_use]
    pub fn exact(mut self, key: impl Into<String>, kind: ErrorKind) -> Self {
        self.exact.insert(key.into(), kind);
        self
    }

    /// Adds a substring match. Earlier entries take priority.
    #[must_use]
    pub fn broad(mut self, keyword: impl Into<String>, kind: ErrorKind) -> Self {
        self.broad.push((keyword.into(), kind));
        self
    }

    /// Kind registered for exactly `key`.
    pub fn find_exact(&self, key: &str) -> Option<ErrorKind> {
        self.exact.get(key).copied()
    }

    /// Kind of the first keyword contained in `message`.
    pub fn find_broad(&self, message: &str) -> Option<ErrorKind> {
        self.broad
            .iter()
            .find(|(keyword, _)| message.contains(keyword.as_str()))
            .map(|(_, kind)| *kind)
    }

    /// Whether both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.broad.is_empty()
    }
}

/// HTTP status to kind table.
#[derive(Debug, Clone)]
pub struct HttpExceptions {
    table: BTreeMap<u16, ErrorKind>,
}

impl Default for HttpExceptions {
    fn default() -> Self {
        use ErrorKind::*;
        let table = [
            (400, BadRequest),
            (401, AuthenticationError),
            (403, PermissionDenied),
            (404, ExchangeNotAvailable),
            (407, AuthenticationError),
            (408, RequestTimeout),
            (409, ExchangeNotAvailable),
            (410, ExchangeNotAvailable),
            (418, DDoSProtection),
            (422, ExchangeError),
            (429, RateLimitExceeded),
            (451, ExchangeNotAvailable),
            (500, ExchangeNotAvailable),
            (501, ExchangeNotAvailable),
            (502, ExchangeNotAvailable),
            (503, ExchangeNotAvailable),
            (504, RequestTimeout),
            (511, AuthenticationError),
            (520, ExchangeNotAvailable),
            (521, ExchangeNotAvailable),
            (522, ExchangeNotAvailable),
            (525, ExchangeNotAvailable),
            (526, ExchangeNotAvailable),
            (530, ExchangeNotAvailable),
        ];
        Self {
            table: table.into_iter().collect(),
        }
    }
}

impl HttpExceptions {
    /// A table with no entries; only the 5xx fallback applies.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Adds or replaces one status.
    #[must_use]
    pub fn with(mut self, status: u16, kind: ErrorKind) -> Self {
        self.table.insert(status, kind);
        self
    }

    /// Kind for `status`. Unlisted 5xx statuses map to `ExchangeNotAvailable`.
    pub fn get(&self, status: u16) -> Option<ErrorKind> {
        self.table.get(&status).copied().or_else(|| {
            (500..600)
                .contains(&status)
                .then_some(ErrorKind::ExchangeNotAvailable)
        })
    }
}

const DDOS_PHRASES: [&str; 3] = ["cloudflare", "incapsula", "ddos"];
const UNAVAILABLE_PHRASES: [&str; 2] = ["temporarily unavailable", "service unavailable"];

/// Classifies responses for one exchange.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier<'a> {
    exchange_id: &'a str,
    exceptions: &'a ExceptionTable,
    http: &'a HttpExceptions,
}

impl<'a> ErrorClassifier<'a> {
    /// Creates a classifier over borrowed tables.
    pub fn new(exchange_id: &'a str, exceptions: &'a ExceptionTable, http: &'a HttpExceptions) -> Self {
        Self {
            exchange_id,
            exceptions,
            http,
        }
    }

    /// Returns the classified failure for `response`, if any.
    ///
    /// `decoded` is the body parsed as JSON, or `None` when it was not JSON.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use unicex_core::classifier::{ErrorClassifier, ExceptionTable, HttpExceptions};
    /// use unicex_core::error::ErrorKind;
    /// use unicex_core::http_client::HttpResponse;
    ///
    /// let table = ExceptionTable::new();
    /// let http = HttpExceptions::default();
    /// let classifier = ErrorClassifier::new("demo", &table, &http);
    /// let response = HttpResponse {
    ///     status: 200,
    ///     headers: BTreeMap::new(),
    ///     body: "<html>Attention Required! | Cloudflare</html>".into(),
    /// };
    /// let err = classifier.classify(&response, None).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::DDoSProtection);
    /// ```
    pub fn classify(&self, response: &HttpResponse, decoded: Option<&Value>) -> Result<()> {
        match self.detect(response, decoded) {
            Some(details) => {
                warn!(
                    exchange = self.exchange_id,
                    status = response.status,
                    kind = %details.kind,
                    code = details.code.as_deref(),
                    "Request failed"
                );
                Err(details.into())
            }
            None => Ok(()),
        }
    }

    fn detect(&self, response: &HttpResponse, decoded: Option<&Value>) -> Option<ClassifiedError> {
        let retry_after = response.header("retry-after").and_then(parse_retry_after);
        let feedback = format!("{} {}", self.exchange_id, response.body);
        let build = |kind: ErrorKind, code: Option<String>| {
            let mut details = ClassifiedError::new(kind, truncate_message(feedback.clone()))
                .with_retry_after(retry_after);
            if let Some(code) = code {
                details = details.with_code(code);
            }
            if let Some(data) = decoded {
                details = details.with_data(data.clone());
            }
            details
        };

        if let Some(body) = decoded {
            let (code, message) = error_fields(body);
            if let Some(kind) = code.as_deref().and_then(|c| self.exceptions.find_exact(c)) {
                return Some(build(kind, code));
            }
            if let Some(kind) = message.as_deref().and_then(|m| self.exceptions.find_exact(m)) {
                return Some(build(kind, code));
            }
            if let Some(kind) = message.as_deref().and_then(|m| self.exceptions.find_broad(m)) {
                return Some(build(kind, code));
            }
        } else if let Some(kind) = infrastructure_kind(&response.body) {
            return Some(build(kind, None));
        }

        if let Some(kind) = self.http.get(response.status) {
            return Some(build(kind, None));
        }
        if !response.is_success() {
            return Some(build(ErrorKind::ExchangeError, None));
        }
        None
    }
}

/// Convenience for callers without a long-lived classifier.
pub fn classify(
    exchange_id: &str,
    response: &HttpResponse,
    decoded: Option<&Value>,
    exceptions: &ExceptionTable,
    http: &HttpExceptions,
) -> Result<()> {
    ErrorClassifier::new(exchange_id, exceptions, http).classify(response, decoded)
}

/// Error code and message from the usual body shapes, including a nested
/// `{"error": {"code": .., "message": ..}}` object.
fn error_fields(body: &Value) -> (Option<String>, Option<String>) {
    let source = match safe_value(body, "error") {
        Some(nested @ Value::Object(_)) => nested,
        _ => body,
    };
    let code = safe_string2(source, "code", "error_code");
    let message = safe_string2(source, "msg", "message").or_else(|| safe_string(source, "error"));
    (code, message)
}

fn infrastructure_kind(body: &str) -> Option<ErrorKind> {
    let lower = body.to_lowercase();
    if DDOS_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(ErrorKind::DDoSProtection);
    }
    if lower.contains("maintenance") {
        return Some(ErrorKind::OnMaintenance);
    }
    if UNAVAILABLE_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(ErrorKind::ExchangeNotAvailable);
    }
    None
}

/// Parses a `Retry-After` value: delay seconds or an HTTP date.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<f64>() {
        return (seconds.is_finite() && seconds >= 0.0).then(|| Duration::from_secs_f64(seconds));
    }
    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&chrono::Utc) - chrono::Utc::now();
    delta.to_std().ok().or(Some(Duration::ZERO))
}
