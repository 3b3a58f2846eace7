use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::assets_model::{normalize_symbol, Asset, NewAsset};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use super::AssetError;
use crate::errors::Result;

/// Service for reading and refreshing the price table
pub struct AssetService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
}

impl AssetService {
    /// Creates a new AssetService instance
    pub fn new(asset_repository: Arc<dyn AssetRepositoryTrait>) -> Self {
        Self { asset_repository }
    }
}

#[async_trait::async_trait]
impl AssetServiceTrait for AssetService {
    fn get_asset(&self, symbol: &str) -> Result<Asset> {
        self.find_asset(symbol)?
            .ok_or_else(|| AssetError::NotFound(normalize_symbol(symbol)).into())
    }

    fn find_asset(&self, symbol: &str) -> Result<Option<Asset>> {
        self.asset_repository.get_by_symbol(&normalize_symbol(symbol))
    }

    fn get_assets(&self) -> Result<Vec<Asset>> {
        self.asset_repository.list()
    }

    fn get_assets_by_symbols(&self, symbols: &[String]) -> Result<HashMap<String, Asset>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }
        let normalized: Vec<String> = symbols.iter().map(|s| normalize_symbol(s)).collect();
        let assets = self.asset_repository.list_by_symbols(&normalized)?;
        Ok(assets
            .into_iter()
            .map(|asset| (asset.symbol.clone(), asset))
            .collect())
    }

    async fn upsert_asset(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;
        debug!(
            "Upserting asset {} at price {}",
            new_asset.symbol, new_asset.current_price
        );
        self.asset_repository.upsert(new_asset).await
    }

    async fn upsert_assets(&self, new_assets: Vec<NewAsset>) -> Result<usize> {
        if new_assets.is_empty() {
            return Ok(0);
        }
        for asset in &new_assets {
            asset.validate()?;
        }
        let now = Utc::now();
        // Last write wins when a batch repeats a symbol.
        let mut deduped: HashMap<String, NewAsset> = HashMap::new();
        for asset in new_assets {
            let mut asset = asset;
            asset.symbol = normalize_symbol(&asset.symbol);
            if asset.last_updated.is_none() {
                asset.last_updated = Some(now);
            }
            deduped.insert(asset.symbol.clone(), asset);
        }
        self.asset_repository
            .upsert_many(deduped.into_values().collect())
            .await
    }
}
