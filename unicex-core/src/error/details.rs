//! Payload of a classified failure.

use serde_json::Value;
use std::time::Duration;

use super::ErrorKind;

/// A failure placed in the taxonomy by the classifier, an adapter or the engine.
///
/// Boxed inside [`Error::Classified`](super::Error::Classified) to keep the
/// error enum small.
///
/// # Example
///
/// ```rust
/// use unicex_core::error::{ClassifiedError, ErrorKind};
///
/// let details = ClassifiedError::new(ErrorKind::BadSymbol, "binance unknown symbol FOO/BAR");
/// assert_eq!(details.kind, ErrorKind::BadSymbol);
/// assert!(details.code.is_none());
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClassifiedError {
    /// Position in the taxonomy.
    pub kind: ErrorKind,
    /// Human readable description, usually `"<exchange id> <raw body>"`.
    pub message: String,
    /// Exchange-native error code when one was matched.
    pub code: Option<String>,
    /// Decoded response payload kept for diagnostics.
    pub data: Option<Value>,
    /// Server-provided wait hint (from `Retry-After`).
    pub retry_after: Option<Duration>,
}

impl ClassifiedError {
    /// Creates a classified error with only a kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            data: None,
            retry_after: None,
        }
    }

    /// Attaches the exchange-native code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches the decoded response payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches a retry hint.
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {} (code: {})", self.kind, self.message, code),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}
