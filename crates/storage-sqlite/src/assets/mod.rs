//! SQLite storage implementation for the price table.

mod model;
mod repository;

pub use model::AssetDB;
pub use repository::AssetRepository;
