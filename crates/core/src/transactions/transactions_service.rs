use chrono::{DateTime, Utc};
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::keyed_lock::KeyedLock;
use super::transactions_errors::TransactionError;
use super::transactions_model::*;
use super::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::assets::{normalize_symbol, AssetServiceTrait};
use crate::events::{DomainEvent, DomainEventSink};
use crate::portfolio::positions::net_balance;
use crate::Result;

/// Idle per-key locks are dropped once the map grows past this size.
const WRITE_LOCK_PRUNE_THRESHOLD: usize = 1024;

/// Write path (validated BUY/SELL recording, deletion) and query path for the ledger.
///
/// Writes for the same `(user_id, asset_symbol)` are serialized through a
/// [`KeyedLock`], so the sell balance check and the append cannot interleave
/// with another writer on that key.
pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    asset_service: Arc<dyn AssetServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    write_locks: KeyedLock,
}

impl TransactionService {
    /// Creates a new TransactionService instance with injected dependencies
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        asset_service: Arc<dyn AssetServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            transaction_repository,
            asset_service,
            event_sink,
            write_locks: KeyedLock::new(),
        }
    }

    /// Must be called with the key's write lock held.
    fn ensure_sufficient_balance(&self, new_transaction: &NewTransaction) -> Result<()> {
        let existing = self
            .transaction_repository
            .find_by_user_and_symbol(&new_transaction.user_id, &new_transaction.asset_symbol)?;
        let available = net_balance(&existing);

        if new_transaction.quantity > available {
            debug!(
                "Rejecting sell of {} {} for user {}: balance is {}",
                new_transaction.quantity,
                new_transaction.asset_symbol,
                new_transaction.user_id,
                available
            );
            return Err(TransactionError::InsufficientFunds {
                symbol: new_transaction.asset_symbol.clone(),
                requested: new_transaction.quantity,
                available,
            }
            .into());
        }
        Ok(())
    }

    fn release_idle_locks(&self) {
        if self.write_locks.len() > WRITE_LOCK_PRUNE_THRESHOLD {
            self.write_locks.prune();
        }
    }

    fn emit_changed(&self, user_id: &str, asset_symbol: &str) {
        self.event_sink.emit(DomainEvent::transactions_changed(
            user_id.to_string(),
            vec![asset_symbol.to_string()],
        ));
    }
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repository
            .get_transaction(user_id, transaction_id)
    }

    fn list_transactions(
        &self,
        user_id: &str,
        filters: Option<TransactionFilters>,
    ) -> Result<Vec<Transaction>> {
        let filters = filters.unwrap_or_default().normalized();
        let mut transactions = self
            .transaction_repository
            .find_filtered(user_id, &filters)?;
        sort_by_date_desc(&mut transactions);
        Ok(transactions)
    }

    fn get_balance(&self, user_id: &str, asset_symbol: &str) -> Result<Decimal> {
        let transactions = self
            .transaction_repository
            .find_by_user_and_symbol(user_id, &normalize_symbol(asset_symbol))?;
        Ok(net_balance(&transactions))
    }

    async fn record_transaction(&self, mut new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.asset_symbol = normalize_symbol(&new_transaction.asset_symbol);
        new_transaction.validate()?;

        let asset = self
            .asset_service
            .find_asset(&new_transaction.asset_symbol)?
            .ok_or_else(|| TransactionError::AssetNotFound(new_transaction.asset_symbol.clone()))?;
        new_transaction.asset_name = asset.name;

        let user_id = new_transaction.user_id.clone();
        let asset_symbol = new_transaction.asset_symbol.clone();

        let created = {
            let _guard = self.write_locks.lock(&user_id, &asset_symbol).await;
            if new_transaction.transaction_type == TransactionType::Sell {
                self.ensure_sufficient_balance(&new_transaction)?;
            }
            self.transaction_repository.create(new_transaction).await?
        };
        self.release_idle_locks();

        info!(
            "Recorded {} {} {} @ {} for user {}",
            created.transaction_type,
            created.quantity,
            created.asset_symbol,
            created.unit_price,
            created.user_id
        );
        self.emit_changed(&user_id, &asset_symbol);
        Ok(created)
    }

    async fn record_buy(
        &self,
        user_id: &str,
        asset_symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Result<Transaction> {
        self.record_transaction(NewTransaction::buy(
            user_id,
            asset_symbol,
            quantity,
            unit_price,
            transaction_date,
        ))
        .await
    }

    async fn record_sell(
        &self,
        user_id: &str,
        asset_symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Result<Transaction> {
        self.record_transaction(NewTransaction::sell(
            user_id,
            asset_symbol,
            quantity,
            unit_price,
            transaction_date,
        ))
        .await
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        // Resolves the key, and rejects ids the user does not own, before locking.
        let existing = self
            .transaction_repository
            .get_transaction(user_id, transaction_id)?;

        let deleted = {
            let _guard = self
                .write_locks
                .lock(user_id, &existing.asset_symbol)
                .await;
            self.transaction_repository
                .delete(user_id, transaction_id)
                .await?
        };
        self.release_idle_locks();

        info!(
            "Deleted transaction {} ({} {}) for user {}",
            deleted.id, deleted.transaction_type, deleted.asset_symbol, deleted.user_id
        );
        self.emit_changed(user_id, &deleted.asset_symbol);
        Ok(deleted)
    }
}
