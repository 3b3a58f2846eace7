//! Coinfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger and valuation logic for Coinfolio.
//! It is database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` crate and by the in-memory stores in [`memory`].

pub mod assets;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod market_data;
pub mod memory;
pub mod portfolio;
pub mod transactions;
pub mod utils;

// Re-export common types from the asset, transaction and portfolio modules
pub use assets::*;
pub use portfolio::*;
pub use transactions::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
