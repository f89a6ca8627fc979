//! unicex exchange adapters
//!
//! Concrete exchanges built on top of `unicex-core`. Each one is a small
//! [`ExchangeAdapter`](unicex_core::ExchangeAdapter) (endpoint catalog, signing
//! and error tables) plus thin implementations of the unified traits.
//!
//! # Supported Exchanges
//!
//! - Binance (spot, API v3)
//! - OKX (spot, API v5)
//!
//! # Example
//!
//! ```rust,no_run
//! use unicex_exchanges::prelude::*;
//!
//! # async fn example() -> unicex_core::Result<()> {
//! let exchange = Binance::builder().build()?;
//! let markets = exchange.load_markets().await?;
//! println!("Found {} markets", markets.len());
//!
//! let book = exchange.fetch_order_book("BTC/USDT", Some(5)).await?;
//! println!("best bid: {:?}", book.best_bid());
//! # Ok(())
//! # }
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
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]

// Re-export unicex-core
pub use unicex_core;

/// Binance exchange implementation
pub mod binance;

/// OKX exchange implementation
pub mod okx;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binance::{Binance, BinanceBuilder};
    pub use crate::okx::{Okx, OkxBuilder};
    pub use unicex_core::prelude::*;
    pub use unicex_core::traits::{ArcFullExchange, BoxedFullExchange};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
