//! Order type definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Case-insensitive parse of `buy`/`sell`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type. Exchange-specific variants stay in [`Order::raw_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
}

impl OrderType {
    /// Case-insensitive parse of `market`/`limit`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "market" => Some(Self::Market),
            "limit" => Some(Self::Limit),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "market"),
            Self::Limit => write!(f, "limit"),
        }
    }
}

/// Unified order status. Every adapter maps its native states onto this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting on the book
    Open,
    /// Fully filled
    Closed,
    /// Canceled before it filled completely
    Canceled,
    /// Cancellation requested but not confirmed
    Canceling,
    /// Refused by the exchange
    Rejected,
    /// Failed after acceptance, e.g. expired
    Failed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Trading fee charged on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Fee currency code
    pub currency: Option<String>,
    /// Fee amount
    pub cost: Decimal,
    /// Fee rate
    pub rate: Option<Decimal>,
}

/// Unified order record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Exchange order id
    pub id: String,
    /// Client-assigned id
    pub client_order_id: Option<String>,
    /// Creation time in milliseconds
    pub timestamp: Option<i64>,
    /// ISO8601 rendering of `timestamp`
    pub datetime: Option<String>,
    /// Last fill time in milliseconds
    pub last_trade_timestamp: Option<i64>,
    /// Unified symbol
    pub symbol: String,
    /// Unified order type, when it is one of the common ones
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    /// Native order type as sent by the exchange
    pub raw_type: Option<String>,
    /// Time in force
    pub time_in_force: Option<String>,
    /// Side
    pub side: Option<OrderSide>,
    /// Limit price
    pub price: Option<Decimal>,
    /// Average fill price
    pub average: Option<Decimal>,
    /// Ordered amount
    pub amount: Option<Decimal>,
    /// Filled amount
    pub filled: Option<Decimal>,
    /// Unfilled amount
    pub remaining: Option<Decimal>,
    /// Filled value in quote currency
    pub cost: Option<Decimal>,
    /// Unified status
    pub status: Option<OrderStatus>,
    /// Fee
    pub fee: Option<Fee>,
    /// The untouched source record
    pub info: Value,
}

impl Order {
    /// Fills `remaining`, `cost` and `average` from the fields present.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use unicex_core::types::Order;
    ///
    /// let order = Order {
    ///     amount: Some(dec!(2)),
    ///     filled: Some(dec!(0.5)),
    ///     price: Some(dec!(100)),
    ///     ..Order::default()
    /// }
    /// .complete();
    /// assert_eq!(order.remaining, Some(dec!(1.5)));
    /// assert_eq!(order.cost, Some(dec!(50)));
    /// ```
    #[must_use]
    pub fn complete(mut self) -> Self {
        if self.remaining.is_none() {
            if let (Some(amount), Some(filled)) = (self.amount, self.filled) {
                self.remaining = amount.checked_sub(filled).map(|r| r.max(Decimal::ZERO));
            }
        }
        if self.filled.is_none() {
            if let (Some(amount), Some(remaining)) = (self.amount, self.remaining) {
                self.filled = amount.checked_sub(remaining).map(|f| f.max(Decimal::ZERO));
            }
        }
        if self.average.is_none() {
            if let (Some(cost), Some(filled)) = (self.cost, self.filled) {
                if !filled.is_zero() {
                    self.average = cost.checked_div(filled);
                }
            }
        }
        if self.cost.is_none() {
            if let Some(filled) = self.filled {
                let price = self.average.or(self.price);
                self.cost = price.and_then(|p| p.checked_mul(filled));
            }
        }
        self
    }

    /// Whether the order is still resting on the book.
    pub fn is_open(&self) -> bool {
        self.status == Some(OrderStatus::Open)
    }
}

/// Parameters for placing an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Unified symbol
    pub symbol: String,
    /// Order type
    pub order_type: OrderType,
    /// Side
    pub side: OrderSide,
    /// Amount in base currency
    pub amount: Decimal,
    /// Limit price; required for limit orders
    pub price: Option<Decimal>,
    /// Client order id
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// A limit order.
    pub fn limit(symbol: impl Into<String>, side: OrderSide, amount: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            order_type: OrderType::Limit,
            side,
            amount,
            price: Some(price),
            client_order_id: None,
        }
    }

    /// A market order.
    pub fn market(symbol: impl Into<String>, side: OrderSide, amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            order_type: OrderType::Market,
            side,
            amount,
            price: None,
            client_order_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_complete_overflow_leaves_remaining_unknown() {
        let order = Order {
            amount: Some(Decimal::MAX),
            filled: Some(dec!(-1)),
            ..Order::default()
        }
        .complete();
        assert_eq!(order.remaining, None);

        let order = Order {
            amount: Some(Decimal::MIN),
            remaining: Some(dec!(1)),
            ..Order::default()
        }
        .complete();
        assert_eq!(order.filled, None);
    }

    #[test]
    fn test_complete_from_cost() {
        let order = Order {
            amount: Some(dec!(4)),
            remaining: Some(dec!(1)),
            cost: Some(dec!(300)),
            ..Order::default()
        }
        .complete();
        assert_eq!(order.filled, Some(dec!(3)));
        assert_eq!(order.average, Some(dec!(100)));
        assert_eq!(order.cost, Some(dec!(300)));
    }

    #[test]
    fn test_complete_leaves_unknowns_alone() {
        let order = Order::default().complete();
        assert_eq!(order.remaining, None);
        assert_eq!(order.cost, None);
        assert_eq!(order.average, None);
    }

    #[test]
    fn test_zero_fill_has_no_average() {
        let order = Order {
            amount: Some(dec!(1)),
            filled: Some(dec!(0)),
            cost: Some(dec!(0)),
            ..Order::default()
        }
        .complete();
        assert_eq!(order.average, None);
        assert_eq!(order.remaining, Some(dec!(1)));
    }

    #[test]
    fn test_enum_parsing_and_display() {
        assert_eq!(OrderSide::parse("BUY"), Some(OrderSide::Buy));
        assert_eq!(OrderType::parse("LIMIT_MAKER"), None);
        assert_eq!(OrderStatus::Canceled.to_string(), "canceled");
        assert_eq!(
            serde_json::to_value(OrderStatus::Canceling).unwrap(),
            serde_json::json!("canceling")
        );
    }
}
