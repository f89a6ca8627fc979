//! Unified data model shared by every adapter.
//!
//! Markets, currencies, order books, orders and balances, plus the generic
//! order book parser.

pub mod balance;
pub mod currency;
pub mod market;
pub mod order;
pub mod orderbook;

pub use balance::{Balance, BalanceEntry, RESERVED_BALANCE_KEYS};
pub use currency::Currency;
pub use market::{Market, MarketLimits, MarketPrecision, MarketType, MinMax};
pub use order::{Fee, Order, OrderRequest, OrderSide, OrderStatus, OrderType};
pub use orderbook::{OrderBook, OrderBookEntry, OrderBookSide, parse_order_book};
