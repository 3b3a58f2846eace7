//! Database model for ledger transactions.

use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use coinfolio_core::transactions::{Transaction, TransactionType};
use coinfolio_core::utils::decimal_utils::parse_decimal_string_tolerant;
use coinfolio_core::utils::time_utils::{parse_storage_timestamp_tolerant, to_storage_timestamp};
use coinfolio_core::Error;

/// Database model for transactions. Quantities and prices are decimal text,
/// dates fixed-width RFC 3339 text so that string order is date order.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub asset_symbol: String,
    pub asset_name: String,
    pub quantity: String,
    pub unit_price: String,
    pub transaction_type: String,
    pub transaction_date: String,
    pub created_at: String,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction_type: TransactionType::from_str(&db.transaction_type)?,
            quantity: parse_decimal_string_tolerant(&db.quantity, "quantity"),
            unit_price: parse_decimal_string_tolerant(&db.unit_price, "unit_price"),
            transaction_date: parse_storage_timestamp_tolerant(
                &db.transaction_date,
                "transaction_date",
            ),
            created_at: parse_storage_timestamp_tolerant(&db.created_at, "created_at"),
            id: db.id,
            user_id: db.user_id,
            asset_symbol: db.asset_symbol,
            asset_name: db.asset_name,
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            asset_symbol: domain.asset_symbol.clone(),
            asset_name: domain.asset_name.clone(),
            quantity: domain.quantity.to_string(),
            unit_price: domain.unit_price.to_string(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            transaction_date: to_storage_timestamp(&domain.transaction_date),
            created_at: to_storage_timestamp(&domain.created_at),
        }
    }
}

/// Converts loaded rows, failing on the first row with an unknown type.
pub fn into_domain(rows: Vec<TransactionDB>) -> coinfolio_core::Result<Vec<Transaction>> {
    rows.into_iter().map(Transaction::try_from).collect()
}
