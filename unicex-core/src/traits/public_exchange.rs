//! PublicExchange trait definition.
//!
//! The base of the trait hierarchy. An implementation hands out its shared
//! [`BaseExchange`], which carries the description, the market registry and
//! the request pipeline; every other trait builds on it.
//!
//! # Example
//!
//! ```rust,ignore
//! use unicex_core::traits::PublicExchange;
//!
//! struct MyExchange {
//!     base: BaseExchange,
//! }
//!
//! impl PublicExchange for MyExchange {
//!     fn base(&self) -> &BaseExchange {
//!         &self.base
//!     }
//! }
//! ```

use crate::base_exchange::BaseExchange;
use crate::precision::PrecisionMode;

/// Base trait for all exchange implementations.
///
/// Requires `Send + Sync` so implementations can be shared across tasks.
pub trait PublicExchange: Send + Sync {
    /// The shared engine backing this exchange.
    fn base(&self) -> &BaseExchange;

    /// Returns the exchange identifier (e.g., "binance", "okx").
    fn id(&self) -> &str {
        self.base().id()
    }

    /// Returns the human-readable exchange name.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Returns the API version, if the exchange declares one.
    fn version(&self) -> Option<&str> {
        self.base().description().version.as_deref()
    }

    /// How the exchange expresses market precision.
    fn precision_mode(&self) -> PrecisionMode {
        self.base().precision_mode()
    }

    /// Whether requests go to the exchange's test environment.
    fn is_sandbox(&self) -> bool {
        self.base().config().sandbox
    }
}
