//! Asset domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AssetError;
use crate::errors::Result;

/// Canonical form of a ticker symbol: trimmed and uppercase.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// A tradable instrument and its latest market price.
///
/// Assets are replaced wholesale on every price refresh (upsert keyed by
/// `symbol`) and never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub image_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Upsert payload for the price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Quote time reported by the provider; defaults to the upsert time.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl NewAsset {
    pub fn new(symbol: &str, name: &str, current_price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price,
            image_url: None,
            last_updated: None,
        }
    }

    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.to_string());
        self
    }

    /// Validates the payload.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(AssetError::InvalidData("Asset symbol cannot be empty".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(AssetError::InvalidData(format!(
                "Asset name cannot be empty for symbol {}",
                self.symbol
            ))
            .into());
        }
        if self.current_price < Decimal::ZERO {
            return Err(AssetError::InvalidData(format!(
                "Price for {} cannot be negative: {}",
                self.symbol, self.current_price
            ))
            .into());
        }
        Ok(())
    }

    /// Builds the stored asset, normalizing the symbol and stamping the update time.
    pub fn into_asset(self, now: DateTime<Utc>) -> Asset {
        Asset {
            symbol: normalize_symbol(&self.symbol),
            name: self.name.trim().to_string(),
            current_price: self.current_price,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            last_updated: self.last_updated.unwrap_or(now),
        }
    }
}
