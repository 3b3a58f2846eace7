use std::sync::RwLock;

use async_trait::async_trait;

use crate::assets::NewAsset;
use crate::errors::{Error, Result};

/// Source of market prices.
///
/// Network clients live outside this crate; they implement this trait and hand
/// back one `NewAsset` per listed coin.
#[async_trait]
pub trait PriceProviderTrait: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    async fn fetch_prices(&self) -> Result<Vec<NewAsset>>;
}

/// Serves a fixed, replaceable price list. Useful for offline runs and tests.
#[derive(Default)]
pub struct StaticPriceProvider {
    prices: RwLock<Vec<NewAsset>>,
}

impl StaticPriceProvider {
    pub fn new(prices: Vec<NewAsset>) -> Self {
        Self {
            prices: RwLock::new(prices),
        }
    }

    /// Replaces the list returned by subsequent fetches.
    pub fn set_prices(&self, prices: Vec<NewAsset>) -> Result<()> {
        let mut guard = self
            .prices
            .write()
            .map_err(|_| Error::PriceProvider("static price list lock poisoned".to_string()))?;
        *guard = prices;
        Ok(())
    }
}

#[async_trait]
impl PriceProviderTrait for StaticPriceProvider {
    fn name(&self) -> &str {
        "STATIC"
    }

    async fn fetch_prices(&self) -> Result<Vec<NewAsset>> {
        self.prices
            .read()
            .map(|prices| prices.clone())
            .map_err(|_| Error::PriceProvider("static price list lock poisoned".to_string()))
    }
}
