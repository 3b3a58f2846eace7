use super::transactions_model::{NewTransaction, Transaction, TransactionFilters};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Trait defining the contract for Transaction repository operations.
///
/// Every read is scoped to a user id first; no method may return or remove
/// another user's rows.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Fails with `TransactionError::NotFound` when the id is absent or owned by someone else.
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Transaction>>;
    fn find_by_user_and_symbol(&self, user_id: &str, asset_symbol: &str)
        -> Result<Vec<Transaction>>;
    /// Returns matching rows sorted by transaction date, newest first.
    fn find_filtered(&self, user_id: &str, filters: &TransactionFilters)
        -> Result<Vec<Transaction>>;
    /// Assigns the id and creation time and appends the record.
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    /// Permanently removes the record and returns it.
    /// Fails with `TransactionError::NotFound` under the same rules as `get_transaction`.
    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
}

/// Trait defining the contract for the transaction recorder and query layer.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(
        &self,
        user_id: &str,
        filters: Option<TransactionFilters>,
    ) -> Result<Vec<Transaction>>;
    /// Net quantity held: sum of buys minus sum of sells.
    fn get_balance(&self, user_id: &str, asset_symbol: &str) -> Result<Decimal>;
    async fn record_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn record_buy(
        &self,
        user_id: &str,
        asset_symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Result<Transaction>;
    async fn record_sell(
        &self,
        user_id: &str,
        asset_symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
}
