use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::poisoned;
use crate::errors::Result;
use crate::transactions::{
    sort_by_date_desc, NewTransaction, Transaction, TransactionError, TransactionFilters,
    TransactionRepositoryTrait,
};

/// Append-only transaction log held in insertion order.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all users.
    pub fn count(&self) -> Result<usize> {
        Ok(self.transactions.read().map_err(poisoned)?.len())
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<Transaction>>
    where
        F: Fn(&Transaction) -> bool,
    {
        let transactions = self.transactions.read().map_err(poisoned)?;
        Ok(transactions
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactionRepository {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let transactions = self.transactions.read().map_err(poisoned)?;
        transactions
            .iter()
            .find(|t| t.id == transaction_id && t.user_id == user_id)
            .cloned()
            .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()).into())
    }

    fn find_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.select(|t| t.user_id == user_id)
    }

    fn find_by_user_and_symbol(
        &self,
        user_id: &str,
        asset_symbol: &str,
    ) -> Result<Vec<Transaction>> {
        self.select(|t| t.user_id == user_id && t.asset_symbol.eq_ignore_ascii_case(asset_symbol))
    }

    fn find_filtered(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>> {
        let mut matching = self.select(|t| t.user_id == user_id && filters.matches(t))?;
        sort_by_date_desc(&mut matching);
        Ok(matching)
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: new_transaction.user_id,
            asset_symbol: new_transaction.asset_symbol,
            asset_name: new_transaction.asset_name,
            quantity: new_transaction.quantity,
            unit_price: new_transaction.unit_price,
            transaction_type: new_transaction.transaction_type,
            transaction_date: new_transaction.transaction_date,
            created_at: Utc::now(),
        };
        let mut transactions = self.transactions.write().map_err(poisoned)?;
        transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut transactions = self.transactions.write().map_err(poisoned)?;
        let index = transactions
            .iter()
            .position(|t| t.id == transaction_id && t.user_id == user_id)
            .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()))?;
        Ok(transactions.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn new_buy(user_id: &str, symbol: &str) -> NewTransaction {
        NewTransaction::buy(
            user_id,
            symbol,
            dec!(1),
            dec!(100),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let repo = InMemoryTransactionRepository::new();
        let a = repo.create(new_buy("u1", "BTC")).await.unwrap();
        let b = repo.create(new_buy("u1", "BTC")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reads_are_scoped_to_owner() {
        let repo = InMemoryTransactionRepository::new();
        let mine = repo.create(new_buy("u1", "BTC")).await.unwrap();
        repo.create(new_buy("u2", "BTC")).await.unwrap();

        assert_eq!(repo.find_by_user("u1").unwrap().len(), 1);
        assert_eq!(repo.find_by_user_and_symbol("u1", "BTC").unwrap().len(), 1);
        assert!(matches!(
            repo.get_transaction("u2", &mine.id),
            Err(Error::Transaction(TransactionError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let repo = InMemoryTransactionRepository::new();
        let mine = repo.create(new_buy("u1", "ETH")).await.unwrap();

        assert!(matches!(
            repo.delete("u2", &mine.id).await,
            Err(Error::Transaction(TransactionError::NotFound(_)))
        ));
        assert_eq!(repo.count().unwrap(), 1);

        let deleted = repo.delete("u1", &mine.id).await.unwrap();
        assert_eq!(deleted.id, mine.id);
        assert_eq!(repo.count().unwrap(), 0);
    }
}
