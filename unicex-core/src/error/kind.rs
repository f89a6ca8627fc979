//! The closed error taxonomy shared by every adapter.
//!
//! Kinds form a tree. Membership checks walk the parent chain, so a
//! `RateLimitExceeded` is also a `DDoSProtection` and a `NetworkError`:
//!
//! ```text
//! NetworkError
//! ├── RequestTimeout
//! ├── ExchangeNotAvailable
//! │   └── OnMaintenance
//! ├── DDoSProtection
//! │   └── RateLimitExceeded
//! └── InvalidNonce
//! ExchangeError
//! ├── AuthenticationError
//! │   ├── PermissionDenied
//! │   └── AccountSuspended
//! ├── BadRequest
//! │   └── BadSymbol
//! ├── BadResponse
//! │   └── NullResponse
//! ├── InsufficientFunds
//! ├── InvalidAddress
//! │   └── AddressPending
//! ├── InvalidOrder
//! │   ├── OrderNotFound
//! │   ├── OrderNotCached
//! │   ├── CancelPending
//! │   ├── OrderImmediatelyFillable
//! │   ├── OrderNotFillable
//! │   └── DuplicateOrderId
//! ├── NotSupported
//! └── ArgumentsRequired
//! InternalError
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A node in the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Root of all transport and availability failures.
    NetworkError,
    /// The request did not complete within the client timeout.
    RequestTimeout,
    /// The exchange is unreachable or answered with a server-side failure.
    ExchangeNotAvailable,
    /// The exchange reports planned maintenance.
    OnMaintenance,
    /// Anti-bot or CDN protection intercepted the request.
    DDoSProtection,
    /// The exchange throttled the client.
    RateLimitExceeded,
    /// The nonce or timestamp was rejected.
    InvalidNonce,
    /// Root of all failures reported by the exchange itself.
    ExchangeError,
    /// Credentials were missing, malformed or rejected.
    AuthenticationError,
    /// The key is valid but lacks the permission for this call.
    PermissionDenied,
    /// The account is frozen or suspended.
    AccountSuspended,
    /// The request was malformed.
    BadRequest,
    /// The symbol or market id is unknown.
    BadSymbol,
    /// The response could not be interpreted.
    BadResponse,
    /// The response was empty where data was required.
    NullResponse,
    /// Not enough balance for the requested action.
    InsufficientFunds,
    /// The withdrawal or deposit address is invalid.
    InvalidAddress,
    /// The address is still being generated.
    AddressPending,
    /// The order parameters were rejected.
    InvalidOrder,
    /// The order does not exist.
    OrderNotFound,
    /// The order is not in the local cache.
    OrderNotCached,
    /// A cancel for this order is already pending.
    CancelPending,
    /// A post-only order would have matched immediately.
    OrderImmediatelyFillable,
    /// A fill-or-kill style order could not be filled.
    OrderNotFillable,
    /// The client order id is already in use.
    DuplicateOrderId,
    /// The operation is not available on this exchange.
    NotSupported,
    /// A required argument was not supplied.
    ArgumentsRequired,
    /// An engine-side defect, such as an undefined endpoint name.
    InternalError,
}

impl ErrorKind {
    /// Every kind, roots first.
    pub const ALL: [ErrorKind; 28] = [
        Self::NetworkError,
        Self::RequestTimeout,
        Self::ExchangeNotAvailable,
        Self::OnMaintenance,
        Self::DDoSProtection,
        Self::RateLimitExceeded,
        Self::InvalidNonce,
        Self::ExchangeError,
        Self::AuthenticationError,
        Self::PermissionDenied,
        Self::AccountSuspended,
        Self::BadRequest,
        Self::BadSymbol,
        Self::BadResponse,
        Self::NullResponse,
        Self::InsufficientFunds,
        Self::InvalidAddress,
        Self::AddressPending,
        Self::InvalidOrder,
        Self::OrderNotFound,
        Self::OrderNotCached,
        Self::CancelPending,
        Self::OrderImmediatelyFillable,
        Self::OrderNotFillable,
        Self::DuplicateOrderId,
        Self::NotSupported,
        Self::ArgumentsRequired,
        Self::InternalError,
    ];

    /// Returns the direct parent, or `None` for the three roots.
    pub const fn parent(self) -> Option<ErrorKind> {
        use ErrorKind::*;
        match self {
            NetworkError | ExchangeError | InternalError => None,
            RequestTimeout | ExchangeNotAvailable | DDoSProtection | InvalidNonce => {
                Some(NetworkError)
            }
            OnMaintenance => Some(ExchangeNotAvailable),
            RateLimitExceeded => Some(DDoSProtection),
            AuthenticationError | BadRequest | BadResponse | InsufficientFunds
            | InvalidAddress | InvalidOrder | NotSupported | ArgumentsRequired => {
                Some(ExchangeError)
            }
            PermissionDenied | AccountSuspended => Some(AuthenticationError),
            BadSymbol => Some(BadRequest),
            NullResponse => Some(BadResponse),
            AddressPending => Some(InvalidAddress),
            OrderNotFound | OrderNotCached | CancelPending | OrderImmediatelyFillable
            | OrderNotFillable | DuplicateOrderId => Some(InvalidOrder),
        }
    }

    /// Iterates from this kind up to its root, inclusive.
    pub fn ancestors(self) -> impl Iterator<Item = ErrorKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Returns `true` if `self` equals `ancestor` or descends from it.
    ///
    /// ```rust
    /// use unicex_core::error::ErrorKind;
    ///
    /// assert!(ErrorKind::RateLimitExceeded.is_a(ErrorKind::DDoSProtection));
    /// assert!(ErrorKind::RateLimitExceeded.is_a(ErrorKind::NetworkError));
    /// assert!(!ErrorKind::RateLimitExceeded.is_a(ErrorKind::ExchangeError));
    /// ```
    pub fn is_a(self, ancestor: ErrorKind) -> bool {
        self.ancestors().any(|kind| kind == ancestor)
    }

    /// Returns the root of this kind's branch.
    pub fn root(self) -> ErrorKind {
        self.ancestors().last().unwrap_or(self)
    }

    /// The canonical name used in exception tables.
    pub const fn name(self) -> &'static str {
        use ErrorKind::*;
        match self {
            NetworkError => "NetworkError",
            RequestTimeout => "RequestTimeout",
            ExchangeNotAvailable => "ExchangeNotAvailable",
            OnMaintenance => "OnMaintenance",
            DDoSProtection => "DDoSProtection",
            RateLimitExceeded => "RateLimitExceeded",
            InvalidNonce => "InvalidNonce",
            ExchangeError => "ExchangeError",
            AuthenticationError => "AuthenticationError",
            PermissionDenied => "PermissionDenied",
            AccountSuspended => "AccountSuspended",
            BadRequest => "BadRequest",
            BadSymbol => "BadSymbol",
            BadResponse => "BadResponse",
            NullResponse => "NullResponse",
            InsufficientFunds => "InsufficientFunds",
            InvalidAddress => "InvalidAddress",
            AddressPending => "AddressPending",
            InvalidOrder => "InvalidOrder",
            OrderNotFound => "OrderNotFound",
            OrderNotCached => "OrderNotCached",
            CancelPending => "CancelPending",
            OrderImmediatelyFillable => "OrderImmediatelyFillable",
            OrderNotFillable => "OrderNotFillable",
            DuplicateOrderId => "DuplicateOrderId",
            NotSupported => "NotSupported",
            ArgumentsRequired => "ArgumentsRequired",
            InternalError => "InternalError",
        }
    }

    /// Looks a kind up by its canonical name.
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Transport-side kinds are worth retrying by a caller-side policy.
    pub fn is_retryable(self) -> bool {
        self.is_a(Self::NetworkError) && self != Self::InvalidNonce
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorKind {
    type Err = super::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| super::Error::internal(format!("Unknown error kind: {s}")))
    }
}
