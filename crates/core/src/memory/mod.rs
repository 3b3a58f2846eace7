//! In-memory implementations of the repository traits.
//!
//! Used by tests and by embedders that do not need persistence. Both stores
//! guard their state with a `RwLock`; a poisoned lock surfaces as
//! [`Error::Unexpected`](crate::Error::Unexpected) instead of a panic.

mod asset_store;
mod transaction_store;

pub use asset_store::InMemoryAssetRepository;
pub use transaction_store::InMemoryTransactionRepository;

use crate::errors::Error;

pub(crate) fn poisoned<T>(_: T) -> Error {
    Error::Unexpected("In-memory store lock poisoned".to_string())
}
