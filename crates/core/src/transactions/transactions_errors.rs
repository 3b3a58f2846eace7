use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the transaction recorder.
///
/// Every variant is raised before any write is attempted.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
    #[error("Insufficient funds to sell {requested} {symbol}: available balance is {available}")]
    InsufficientFunds {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },
    /// Also returned when the transaction exists but belongs to another user.
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
