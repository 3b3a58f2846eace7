//! Transactions module - the per-user BUY/SELL ledger: models, recorder service, and traits.

mod keyed_lock;
mod transactions_errors;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


#[cfg(test)]
mod transactions_service_tests;

pub use keyed_lock::KeyedLock;
pub use transactions_errors::TransactionError;
pub use transactions_model::{
    sort_by_date_desc, NewTransaction, Transaction, TransactionFilters, TransactionType,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
