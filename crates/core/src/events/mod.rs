//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful ledger mutations. The embedding application implements
//! the sink to forward them to clients (price and transaction notifications).

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
