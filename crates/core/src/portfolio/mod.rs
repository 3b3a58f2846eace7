//! Portfolio module - derived positions and their valuation.
//!
//! Nothing here is persisted: positions are folded from the transaction log
//! on every request and combined with the current price table.

pub mod positions;
pub mod valuation;

pub use positions::*;
pub use valuation::*;
