//! Currency type definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A currency as seen by one exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Exchange-native id
    pub id: String,
    /// Unified code
    pub code: String,
    /// Human readable name
    pub name: Option<String>,
    /// Digit count or step, per the exchange's precision mode
    pub precision: Option<Decimal>,
    /// Deposits/withdrawals enabled, when known
    pub active: Option<bool>,
    /// Source record; `Value::Null` for currencies derived from markets
    pub info: Value,
}

impl Currency {
    /// Creates a currency with only its identity and precision.
    pub fn new(id: impl Into<String>, code: impl Into<String>, precision: Option<Decimal>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            precision,
            ..Self::default()
        }
    }
}
