use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use coinfolio_core::assets::normalize_symbol;
use coinfolio_core::transactions::{
    NewTransaction, Transaction, TransactionError, TransactionFilters, TransactionRepositoryTrait,
};
use coinfolio_core::utils::time_utils::to_storage_timestamp;
use coinfolio_core::Result;

use super::model::{into_domain, TransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn find_owned(
        conn: &mut SqliteConnection,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<TransactionDB> {
        transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::user_id.eq(user_id))
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()).into())
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_owned(&mut conn, user_id, transaction_id)?.try_into()
    }

    fn find_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order((transactions::transaction_date.asc(), transactions::created_at.asc()))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    fn find_by_user_and_symbol(
        &self,
        user_id: &str,
        asset_symbol: &str,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::asset_symbol.eq(normalize_symbol(asset_symbol)))
            .order((transactions::transaction_date.asc(), transactions::created_at.asc()))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    fn find_filtered(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>> {
        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id.to_string()))
            .into_boxed();

        if let Some(symbol) = &filters.asset_symbol {
            query = query.filter(transactions::asset_symbol.eq(normalize_symbol(symbol)));
        }
        if let Some(transaction_type) = filters.transaction_type {
            query = query.filter(transactions::transaction_type.eq(transaction_type.as_str()));
        }
        if let Some(start) = filters.start_date {
            query = query.filter(transactions::transaction_date.ge(to_storage_timestamp(&start)));
        }
        if let Some(end) = filters.end_date {
            query = query.filter(transactions::transaction_date.le(to_storage_timestamp(&end)));
        }

        let mut conn = get_connection(&self.pool)?;
        let rows = query
            .order((
                transactions::transaction_date.desc(),
                transactions::created_at.desc(),
                transactions::id.desc(),
            ))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: new_transaction.user_id,
            asset_symbol: normalize_symbol(&new_transaction.asset_symbol),
            asset_name: new_transaction.asset_name,
            quantity: new_transaction.quantity,
            unit_price: new_transaction.unit_price,
            transaction_type: new_transaction.transaction_type,
            transaction_date: new_transaction.transaction_date,
            created_at: Utc::now(),
        };
        let row = TransactionDB::from(&transaction);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                diesel::insert_into(transactions::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                // Re-read through the stored form so callers see what later reads return.
                row.try_into()
            })
            .await
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let row = Self::find_owned(conn, &user_id, &transaction_id)?;
                diesel::delete(
                    transactions::table
                        .filter(transactions::id.eq(&transaction_id))
                        .filter(transactions::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                row.try_into()
            })
            .await
    }
}
