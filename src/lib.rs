//! # unicex
//!
//! A unified REST client for cryptocurrency exchanges. Every exchange speaks
//! through the same traits and data model; adapters only describe their
//! endpoints, signing scheme and error codes.
//!
//! ## Features
//!
//! - **Async/Await**: Built on tokio; markets load once per client
//! - **Exact numbers**: Prices and amounts are `rust_decimal::Decimal`
//! - **Classified errors**: One taxonomy for every exchange, with retry hints
//! - **Exchanges**: Binance and OKX spot
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use unicex::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let exchange = Okx::builder().build()?;
//!     exchange.load_markets().await?;
//!     let book = exchange.fetch_order_book("BTC/USDT", Some(10)).await?;
//!     println!("{:?}", book.spread());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Re-export core types and traits
pub use unicex_core::{
    error::{Error, ErrorKind, Result},
    types::*,
};

// Re-export exchange implementations
pub use unicex_exchanges::{binance, okx};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use unicex_exchanges::prelude::*;
}
