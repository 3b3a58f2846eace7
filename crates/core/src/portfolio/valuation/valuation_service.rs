use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use super::valuation_model::{Portfolio, PortfolioSummary, PositionValuation};
use super::valuation_traits::ValuationServiceTrait;
use crate::assets::{normalize_symbol, Asset, AssetServiceTrait};
use crate::portfolio::positions::{group_by_symbol, BalanceAccumulator};
use crate::transactions::{Transaction, TransactionRepositoryTrait};
use crate::Result;

/// Values a user's holdings from the transaction log and the current price table.
///
/// Nothing is cached: each call re-reads both stores.
pub struct ValuationService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    asset_service: Arc<dyn AssetServiceTrait>,
}

impl ValuationService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        asset_service: Arc<dyn AssetServiceTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            asset_service,
        }
    }

    fn value_group(
        &self,
        symbol: &str,
        transactions: &[Transaction],
        asset: Option<&Asset>,
    ) -> Option<PositionValuation> {
        let current_price = match asset {
            Some(asset) => asset.current_price,
            None => {
                warn!(
                    "Asset {} missing from price table. Valuing holding at zero.",
                    symbol
                );
                Decimal::ZERO
            }
        };

        let position =
            BalanceAccumulator::from_transactions(transactions).into_position(symbol, current_price)?;

        // Fall back to the name captured on the most recent transaction.
        let fallback_name = || {
            transactions
                .iter()
                .max_by_key(|t| t.transaction_date)
                .map(|t| t.asset_name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| symbol.to_string())
        };

        Some(PositionValuation {
            asset_name: asset.map_or_else(fallback_name, |a| a.name.clone()),
            image_url: asset.and_then(|a| a.image_url.clone()),
            price_updated_at: asset.map(|a| a.last_updated),
            position,
        })
    }

    fn value_transactions(&self, transactions: Vec<Transaction>) -> Result<Vec<PositionValuation>> {
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let groups = group_by_symbol(transactions);
        let symbols: Vec<String> = groups.keys().cloned().collect();
        let assets = self.asset_service.get_assets_by_symbols(&symbols)?;

        Ok(groups
            .iter()
            .filter_map(|(symbol, group)| self.value_group(symbol, group, assets.get(symbol)))
            .collect())
    }
}

fn by_value_desc(a: &PositionValuation, b: &PositionValuation) -> Ordering {
    b.position
        .current_value
        .cmp(&a.position.current_value)
        .then_with(|| a.symbol().cmp(b.symbol()))
}

impl ValuationServiceTrait for ValuationService {
    fn valuate(&self, user_id: &str) -> Result<Vec<PositionValuation>> {
        let transactions = self.transaction_repository.find_by_user(user_id)?;
        let valuations = self.value_transactions(transactions)?;
        debug!(
            "Valued {} position(s) for user {}",
            valuations.len(),
            user_id
        );
        Ok(valuations)
    }

    fn get_portfolio(&self, user_id: &str) -> Result<Portfolio> {
        let mut positions = self.valuate(user_id)?;
        positions.sort_by(by_value_desc);
        let summary = PortfolioSummary::from_positions(&positions);

        Ok(Portfolio {
            user_id: user_id.to_string(),
            positions,
            summary,
        })
    }

    fn get_position(&self, user_id: &str, asset_symbol: &str) -> Result<Option<PositionValuation>> {
        let symbol = normalize_symbol(asset_symbol);
        let transactions = self
            .transaction_repository
            .find_by_user_and_symbol(user_id, &symbol)?;
        Ok(self.value_transactions(transactions)?.into_iter().next())
    }
}
