use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user's current holding of one asset, derived from the transaction log.
///
/// Only ever built for a strictly positive remaining quantity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub asset_symbol: String,
    pub quantity: Decimal,
    /// Money still tied up in the remaining quantity.
    pub cost_basis: Decimal,
    /// `cost_basis / quantity`.
    pub average_cost: Decimal,
    pub current_price: Decimal,
    /// `quantity * current_price`.
    pub current_value: Decimal,
    /// `current_value - cost_basis`.
    pub unrealized_pnl: Decimal,
    /// `unrealized_pnl / cost_basis * 100`; zero when the cost basis is zero.
    pub unrealized_pnl_percentage: Decimal,
}
