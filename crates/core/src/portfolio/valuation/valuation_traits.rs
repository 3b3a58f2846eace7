use super::valuation_model::{Portfolio, PositionValuation};
use crate::errors::Result;

/// Read path of the ledger. Implementations hold no mutable state, so two calls
/// with no write in between return identical results.
pub trait ValuationServiceTrait: Send + Sync {
    /// Every asset the user currently holds, valued at the current price.
    /// Assets with no remaining quantity are omitted. No ordering is guaranteed.
    fn valuate(&self, user_id: &str) -> Result<Vec<PositionValuation>>;

    /// Positions sorted by current value (descending), plus aggregates.
    fn get_portfolio(&self, user_id: &str) -> Result<Portfolio>;

    /// The user's position in one asset, if any is held.
    fn get_position(&self, user_id: &str, asset_symbol: &str) -> Result<Option<PositionValuation>>;
}
