//! SQLite storage implementation for Coinfolio.
//!
//! Implements the repository traits defined in `coinfolio-core` with Diesel:
//! - connection pooling and embedded migrations
//! - a single writer actor that runs every write in an immediate transaction
//! - repositories for the price table and the transaction ledger
//!
//! ```text
//!   coinfolio-core (domain, traits)
//!            │
//!            ▼
//!   storage-sqlite (this crate) ──▶ SQLite file
//! ```
//!
//! Decimals are stored as text so that no precision is lost between writes and reads.

pub mod assets;
pub mod db;
pub mod errors;
pub mod schema;
pub mod transactions;
pub mod utils;

pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, Database,
    DbConnection, DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use assets::AssetRepository;
pub use transactions::TransactionRepository;

pub use coinfolio_core::errors::{DatabaseError, Error, Result};
