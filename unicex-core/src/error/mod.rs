//! # Error handling
//!
//! Every failure surfaced by the engine carries an [`ErrorKind`] from a
//! closed, hierarchical taxonomy. Callers branch on membership rather than on
//! concrete variants:
//!
//! ```rust
//! use unicex_core::error::{Error, ErrorKind};
//!
//! let err = Error::rate_limit("binance too many requests", None);
//! assert!(err.is(ErrorKind::DDoSProtection));
//! assert!(err.is(ErrorKind::NetworkError));
//! assert!(!err.is(ErrorKind::ExchangeError));
//! ```
//!
//! ## Variants
//!
//! ```text
//! Error
//! ├── Classified - any taxonomy kind with message, code and raw payload
//! ├── Network    - transport failure before a body was received
//! ├── Parse      - payload could not be interpreted (BadResponse)
//! └── Context    - another Error with a context message attached
//! ```
//!
//! ## Adding context
//!
//! ```rust
//! use unicex_core::error::{ContextExt, Error, Result};
//!
//! fn place(symbol: &str) -> Result<()> {
//!     submit(symbol).with_context(|| format!("Failed to place order on {symbol}"))
//! }
//! # fn submit(_: &str) -> Result<()> { Ok(()) }
//! ```
//!
//! Large variants are boxed and messages use `Cow<'static, str>` where they
//! are commonly static, so `Error` stays small on the happy path.

mod context;
mod convert;
mod details;
mod kind;
mod network;
mod parse;

use serde_json::Value;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

pub use context::ContextExt;
pub use details::ClassifiedError;
pub use kind::ErrorKind;
pub use network::NetworkError;
pub use parse::ParseError;

pub(crate) use convert::truncate_message;

/// Result type alias for all engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type.
///
/// ```rust
/// use unicex_core::error::{Error, ErrorKind};
///
/// let err = Error::authentication("okx requires \"password\" credential");
/// assert_eq!(err.kind(), ErrorKind::AuthenticationError);
/// assert!(err.to_string().contains("password"));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A failure placed in the taxonomy.
    #[error("{0}")]
    Classified(Box<ClassifiedError>),

    /// Transport failure; no response body was received.
    #[error("Network error: {0}")]
    Network(Box<NetworkError>),

    /// The payload could not be turned into unified types.
    #[error("Parse error: {0}")]
    Parse(Box<ParseError>),

    /// Error with additional context, preserving the error chain.
    #[error("{context}")]
    Context {
        /// Context message describing what operation failed
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    // ==================== Constructor Methods ====================

    /// Creates a classified error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ClassifiedError::new(kind, truncate_message(message.into())).into()
    }

    /// Creates a classified error carrying the decoded response payload.
    pub fn with_data(kind: ErrorKind, message: impl Into<String>, data: Value) -> Self {
        ClassifiedError::new(kind, truncate_message(message.into()))
            .with_data(data)
            .into()
    }

    /// Creates an error from a kind name as found in exception tables.
    ///
    /// Unknown names are themselves an engine defect and produce
    /// `InternalError`.
    pub fn typed(kind_name: &str, message: impl Into<String>) -> Self {
        match ErrorKind::from_name(kind_name) {
            Some(kind) => Self::new(kind, message),
            None => Self::internal(format!(
                "Unknown error kind '{kind_name}': {}",
                message.into()
            )),
        }
    }

    /// Generic exchange-side failure.
    pub fn exchange(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExchangeError, message)
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::AuthenticationError, message.into())
    }

    /// Creates a permission error.
    pub fn permission_denied(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message.into())
    }

    /// Creates a rate limit error with an optional wait hint.
    pub fn rate_limit(
        message: impl Into<Cow<'static, str>>,
        retry_after: Option<Duration>,
    ) -> Self {
        ClassifiedError::new(ErrorKind::RateLimitExceeded, message.into())
            .with_retry_after(retry_after)
            .into()
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message.into())
    }

    /// Creates a bad symbol error.
    pub fn bad_symbol(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadSymbol, message.into())
    }

    /// Creates a bad response error.
    pub fn bad_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadResponse, message.into())
    }

    /// Creates an insufficient funds error.
    pub fn insufficient_funds(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InsufficientFunds, message.into())
    }

    /// Creates an invalid order error.
    pub fn invalid_order(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidOrder, message.into())
    }

    /// Creates an order not found error.
    pub fn order_not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::OrderNotFound, message.into())
    }

    /// Creates a not supported error.
    pub fn not_supported(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotSupported, message.into())
    }

    /// Creates an arguments required error.
    pub fn arguments_required(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ArgumentsRequired, message.into())
    }

    /// Creates an engine-side defect error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalError, message.into())
    }

    /// Creates an exchange unavailable error.
    pub fn exchange_not_available(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ExchangeNotAvailable, message.into())
    }

    /// Creates a timeout error for a request that ran past the client deadline.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::RequestTimeout, message.into())
    }

    /// Creates a connection-level network error.
    pub fn network(message: impl Into<String>) -> Self {
        NetworkError::ConnectionFailed(truncate_message(message.into())).into()
    }

    // ==================== Context Methods ====================

    /// Attaches context to an existing error.
    ///
    /// ```rust
    /// use unicex_core::error::{Error, ErrorKind};
    ///
    /// let err = Error::network("Connection refused").context("Failed to fetch order book");
    /// assert_eq!(err.kind(), ErrorKind::NetworkError);
    /// ```
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    // ==================== Chain Traversal Methods ====================

    fn iter_chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| match err {
            Error::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        })
    }

    /// Returns the root cause of the error, skipping Context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        self.iter_chain().last().unwrap_or(self)
    }

    /// Generates a detailed error report with the full chain.
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();
        report.push_str(&self.to_string());

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            let _ = write!(report, "\nCaused by: {err}");
            current = err.source();
        }
        report
    }

    // ==================== Taxonomy (Context Penetrating) ====================

    /// Position of the root cause in the taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            Error::Classified(details) => details.kind,
            Error::Network(net) => net.kind(),
            Error::Parse(_) => ErrorKind::BadResponse,
            // root_cause never yields a Context layer
            Error::Context { .. } => ErrorKind::InternalError,
        }
    }

    /// Kind-set membership test: `true` when this error's kind is `kind`
    /// or one of its descendants.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind().is_a(kind)
    }

    /// The classified payload, if the root cause carries one.
    #[must_use]
    pub fn as_classified(&self) -> Option<&ClassifiedError> {
        match self.root_cause() {
            Error::Classified(details) => Some(details),
            _ => None,
        }
    }

    /// Exchange-native error code, when one was matched.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.as_classified().and_then(|d| d.code.as_deref())
    }

    /// Decoded response payload kept for diagnostics.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.as_classified().and_then(|d| d.data.as_ref())
    }

    /// Whether a caller-side retry policy may try again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Server-provided wait hint, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.as_classified().and_then(|d| d.retry_after)
    }
}
