use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::poisoned;
use crate::assets::{normalize_symbol, Asset, AssetRepositoryTrait, NewAsset};
use crate::errors::Result;

/// Price table keyed by normalized symbol.
#[derive(Default)]
pub struct InMemoryAssetRepository {
    assets: RwLock<HashMap<String, Asset>>,
}

impl InMemoryAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `assets`.
    pub fn with_assets(assets: Vec<NewAsset>) -> Self {
        let now = Utc::now();
        let assets = assets
            .into_iter()
            .map(|new_asset| {
                let asset = new_asset.into_asset(now);
                (asset.symbol.clone(), asset)
            })
            .collect();
        Self {
            assets: RwLock::new(assets),
        }
    }

    /// Removes an asset from the price table. Returns whether it existed.
    pub fn remove(&self, symbol: &str) -> Result<bool> {
        let mut assets = self.assets.write().map_err(poisoned)?;
        Ok(assets.remove(&normalize_symbol(symbol)).is_some())
    }
}

#[async_trait]
impl AssetRepositoryTrait for InMemoryAssetRepository {
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Asset>> {
        let assets = self.assets.read().map_err(poisoned)?;
        Ok(assets.get(&normalize_symbol(symbol)).cloned())
    }

    fn list(&self) -> Result<Vec<Asset>> {
        let assets = self.assets.read().map_err(poisoned)?;
        let mut list: Vec<Asset> = assets.values().cloned().collect();
        list.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(list)
    }

    fn list_by_symbols(&self, symbols: &[String]) -> Result<Vec<Asset>> {
        let assets = self.assets.read().map_err(poisoned)?;
        Ok(symbols
            .iter()
            .filter_map(|symbol| assets.get(&normalize_symbol(symbol)).cloned())
            .collect())
    }

    async fn upsert(&self, new_asset: NewAsset) -> Result<Asset> {
        let asset = new_asset.into_asset(Utc::now());
        let mut assets = self.assets.write().map_err(poisoned)?;
        assets.insert(asset.symbol.clone(), asset.clone());
        Ok(asset)
    }

    async fn upsert_many(&self, new_assets: Vec<NewAsset>) -> Result<usize> {
        let now = Utc::now();
        let mut assets = self.assets.write().map_err(poisoned)?;
        let count = new_assets.len();
        for new_asset in new_assets {
            let asset = new_asset.into_asset(now);
            assets.insert(asset.symbol.clone(), asset);
        }
        Ok(count)
    }
}
