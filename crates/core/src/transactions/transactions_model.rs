//! Transaction domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TransactionError;
use crate::assets::normalize_symbol;
use crate::errors::Result;
use crate::utils::time_utils::{end_of_day, is_storable_timestamp, start_of_day};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    /// Returns the database string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Immutable ledger entry. Once created it is never mutated, only deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub asset_symbol: String,
    /// Asset name at the time the transaction was recorded.
    pub asset_name: String,
    pub quantity: Decimal,
    /// Price per unit paid or received, independent of the current market price.
    pub unit_price: Decimal,
    pub transaction_type: TransactionType,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_buy(&self) -> bool {
        self.transaction_type == TransactionType::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.transaction_type == TransactionType::Sell
    }

    /// Money moved by this transaction: `quantity * unit_price`.
    /// Saturates at `Decimal::MAX`; recorded transactions always fit.
    pub fn usd_amount(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_price)
    }

    /// Quantity with the sign of its effect on the balance.
    pub fn signed_quantity(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Buy => self.quantity,
            TransactionType::Sell => -self.quantity,
        }
    }
}

/// Input model for appending a transaction to the ledger.
///
/// `asset_name` is stamped by the recorder from the asset lookup; whatever the
/// caller puts there is overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub user_id: String,
    pub asset_symbol: String,
    #[serde(default)]
    pub asset_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub transaction_type: TransactionType,
    pub transaction_date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        user_id: &str,
        asset_symbol: &str,
        transaction_type: TransactionType,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            asset_symbol: normalize_symbol(asset_symbol),
            asset_name: String::new(),
            quantity,
            unit_price,
            transaction_type,
            transaction_date,
        }
    }

    pub fn buy(
        user_id: &str,
        asset_symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        Self::new(
            user_id,
            asset_symbol,
            TransactionType::Buy,
            quantity,
            unit_price,
            transaction_date,
        )
    }

    pub fn sell(
        user_id: &str,
        asset_symbol: &str,
        quantity: Decimal,
        unit_price: Decimal,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        Self::new(
            user_id,
            asset_symbol,
            TransactionType::Sell,
            quantity,
            unit_price,
            transaction_date,
        )
    }

    /// Validates the payload.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(TransactionError::InvalidData("User ID cannot be empty".to_string()).into());
        }
        if self.asset_symbol.trim().is_empty() {
            return Err(
                TransactionError::InvalidData("Asset symbol cannot be empty".to_string()).into(),
            );
        }
        if self.quantity <= Decimal::ZERO {
            return Err(TransactionError::InvalidData(format!(
                "Quantity must be positive, got {}",
                self.quantity
            ))
            .into());
        }
        if self.unit_price < Decimal::ZERO {
            return Err(TransactionError::InvalidData(format!(
                "Unit price cannot be negative, got {}",
                self.unit_price
            ))
            .into());
        }
        if self.quantity.checked_mul(self.unit_price).is_none() {
            return Err(TransactionError::InvalidData(format!(
                "Amount {} x {} is out of range",
                self.quantity, self.unit_price
            ))
            .into());
        }
        if !is_storable_timestamp(&self.transaction_date) {
            return Err(TransactionError::InvalidData(format!(
                "Transaction date {} must fall between years 0 and 9999",
                self.transaction_date
            ))
            .into());
        }
        Ok(())
    }
}

/// Optional narrowing applied after scoping a listing to one user.
/// Present filters are combined with logical AND; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub asset_symbol: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl TransactionFilters {
    pub fn for_symbol(symbol: &str) -> Self {
        Self {
            asset_symbol: Some(normalize_symbol(symbol)),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Restricts to transactions dated within `[start, end]`, whole days included.
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start_of_day(start));
        self.end_date = Some(end_of_day(end));
        self
    }

    /// Uppercases the symbol and drops an empty one.
    pub fn normalized(mut self) -> Self {
        self.asset_symbol = self
            .asset_symbol
            .map(|s| normalize_symbol(&s))
            .filter(|s| !s.is_empty());
        self
    }

    /// Whether a transaction satisfies every present filter.
    /// Does not check ownership; callers scope by user first.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(ref symbol) = self.asset_symbol {
            if !transaction.asset_symbol.eq_ignore_ascii_case(symbol) {
                return false;
            }
        }
        if let Some(transaction_type) = self.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if transaction.transaction_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if transaction.transaction_date > end {
                return false;
            }
        }
        true
    }
}

/// Newest first by transaction date; ties broken by creation time, newest first.
pub fn sort_by_date_desc(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.transaction_date
            .cmp(&a.transaction_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
}
