//! Account trait definition.
//!
//! Balance queries. These operations require credentials.

use async_trait::async_trait;

use super::PublicExchange;
use crate::error::{Error, Result};
use crate::types::{Balance, BalanceEntry};

/// Trait for account operations.
#[async_trait]
pub trait Account: PublicExchange {
    /// Fetches balances for every currency on the account.
    async fn fetch_balance(&self) -> Result<Balance>;

    /// Fetches the balance of one currency.
    ///
    /// Returns `BadRequest` when the account holds no entry for `code`.
    async fn get_balance(&self, code: &str) -> Result<BalanceEntry> {
        let balance = self.fetch_balance().await?;
        balance.get(code).copied().ok_or_else(|| {
            Error::bad_request(format!("{} has no balance for {code}", self.id()))
        })
    }
}

/// Type alias for boxed Account trait object.
pub type BoxedAccount = Box<dyn Account>;
