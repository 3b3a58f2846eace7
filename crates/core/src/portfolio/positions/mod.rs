//! Balance accumulation: folding a (user, asset) transaction sequence into a position.

mod balance_accumulator;
mod positions_model;


pub use balance_accumulator::{accumulate, group_by_symbol, net_balance, BalanceAccumulator};
pub use positions_model::Position;
