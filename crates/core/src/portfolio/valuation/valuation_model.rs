use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::positions::Position;
use crate::utils::decimal_utils::percentage_of;

/// A position together with the asset's display metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub asset_name: String,
    pub image_url: Option<String>,
    /// When the price used for this valuation was last refreshed.
    /// `None` when the asset is missing from the price table.
    pub price_updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub position: Position,
}

impl PositionValuation {
    pub fn symbol(&self) -> &str {
        &self.position.asset_symbol
    }

    /// Share of `total_value` held in this position, in percent.
    pub fn allocation_percentage(&self, total_value: Decimal) -> Decimal {
        percentage_of(self.position.current_value, total_value)
    }
}

/// Portfolio-level aggregates, pure reductions over the positions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_value: Decimal,
    pub total_pnl: Decimal,
    /// Zero when nothing is invested.
    pub total_pnl_percentage: Decimal,
    pub position_count: usize,
}

impl PortfolioSummary {
    pub fn from_positions(positions: &[PositionValuation]) -> Self {
        let total_invested = positions
            .iter()
            .map(|p| p.position.cost_basis)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let total_value = positions
            .iter()
            .map(|p| p.position.current_value)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let total_pnl = total_value.saturating_sub(total_invested);

        Self {
            total_invested,
            total_value,
            total_pnl,
            total_pnl_percentage: percentage_of(total_pnl, total_invested),
            position_count: positions.len(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub user_id: String,
    /// Largest current value first.
    pub positions: Vec<PositionValuation>,
    pub summary: PortfolioSummary,
}
