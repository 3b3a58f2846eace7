use std::collections::HashMap;

use super::assets_model::{Asset, NewAsset};
use crate::errors::Result;

/// Trait defining the contract for Asset service operations.
#[async_trait::async_trait]
pub trait AssetServiceTrait: Send + Sync {
    /// Returns the asset or `AssetError::NotFound`.
    fn get_asset(&self, symbol: &str) -> Result<Asset>;
    fn find_asset(&self, symbol: &str) -> Result<Option<Asset>>;
    fn get_assets(&self) -> Result<Vec<Asset>>;
    /// Returns the known assets among `symbols`, keyed by normalized symbol.
    /// Unknown symbols are simply absent from the map.
    fn get_assets_by_symbols(&self, symbols: &[String]) -> Result<HashMap<String, Asset>>;
    async fn upsert_asset(&self, new_asset: NewAsset) -> Result<Asset>;
    async fn upsert_assets(&self, new_assets: Vec<NewAsset>) -> Result<usize>;
}

/// Trait defining the contract for Asset repository operations.
#[async_trait::async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Asset>>;
    fn list(&self) -> Result<Vec<Asset>>;
    fn list_by_symbols(&self, symbols: &[String]) -> Result<Vec<Asset>>;
    async fn upsert(&self, new_asset: NewAsset) -> Result<Asset>;
    /// Upserts every asset in one write. Returns the number of rows written.
    async fn upsert_many(&self, new_assets: Vec<NewAsset>) -> Result<usize>;
}
