//! unicex core library
//!
//! The exchange-agnostic engine behind every adapter: tolerant JSON access,
//! request signing, decimal precision formatting, order book parsing, error
//! classification, the market registry and the request pipeline.
//!
//! # Features
//!
//! - **Precision**: Uses `rust_decimal::Decimal` for accurate financial calculations
//! - **Async/Await**: Built on tokio; markets load once no matter how many tasks ask
//! - **Error Handling**: A classified error taxonomy with `thiserror`
//! - **Declarative adapters**: Exchanges describe endpoints and error tables as data
//!
//! # Example
//!
//! ```rust
//! use unicex_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let price = decimal_to_precision(
//!     dec!(0.123456),
//!     RoundingMode::Truncate,
//!     Some(dec!(4)),
//!     PrecisionMode::DecimalPlaces,
//!     PaddingMode::NoPadding,
//! )
//! .unwrap();
//! assert_eq!(price, "0.1234");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]

// Re-exports of external dependencies
pub use rust_decimal;
pub use serde;
pub use serde_json;

pub mod adapter;
pub mod auth;
pub mod base_exchange;
pub mod classifier;
pub mod credentials;
pub mod description;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod parser_utils;
pub mod precision;
pub mod rate_limiter;
pub mod signed_request;
pub mod time;
/// Unified operation traits
pub mod traits;
pub mod types;

pub use adapter::ExchangeAdapter;
pub use base_exchange::{BaseExchange, ExchangeConfig, ExchangeConfigBuilder, MarketRegistry};
pub use credentials::{Credentials, RequiredCredentials, SecretString};
pub use description::ExchangeDescription;
pub use error::{ClassifiedError, ContextExt, Error, ErrorKind, NetworkError, ParseError, Result};
pub use types::{
    Balance, BalanceEntry, Currency, Fee, Market, MarketLimits, MarketPrecision, MarketType,
    MinMax, Order, OrderBook, OrderBookEntry, OrderBookSide, OrderRequest, OrderSide, OrderStatus,
    OrderType,
};

/// Prelude module for convenient imports
///
/// ```rust
/// use unicex_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adapter::ExchangeAdapter;
    pub use crate::auth::{DigestFormat, HashAlgorithm, hash, hmac_sign, jwt, rawencode, urlencode};
    pub use crate::base_exchange::{
        BaseExchange, ExchangeConfig, ExchangeConfigBuilder, MarketRegistry,
    };
    pub use crate::classifier::{ErrorClassifier, ExceptionTable, HttpExceptions};
    pub use crate::credentials::{Credentials, RequiredCredentials};
    pub use crate::description::ExchangeDescription;
    pub use crate::error::{ContextExt, Error, ErrorKind, Result};
    pub use crate::http_client::{HttpClient, HttpConfig, HttpResponse};
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::parser_utils::{
        safe_bool, safe_decimal, safe_float, safe_integer, safe_string, safe_value,
    };
    pub use crate::precision::{
        PaddingMode, PrecisionMode, RoundingMode, decimal_to_precision, number_to_string,
        precision_from_string,
    };
    pub use crate::rate_limiter::{RateLimiter, RateLimiterConfig};
    pub use crate::signed_request::{HttpMethod, PreparedRequest, SignContext, SignRequest};
    pub use crate::time::{iso8601, milliseconds, parse8601, seconds};
    pub use crate::traits::{Account, FullExchange, MarketData, PublicExchange, Trading};
    pub use crate::types::{
        Balance, BalanceEntry, Currency, Fee, Market, MarketLimits, MarketPrecision, MarketType,
        Order, OrderBook, OrderBookEntry, OrderRequest, OrderSide, OrderStatus, OrderType,
    };
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "unicex-core");
    }
}
