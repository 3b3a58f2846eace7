//! Database model for assets.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use coinfolio_core::assets::{Asset, NewAsset};
use coinfolio_core::utils::decimal_utils::parse_decimal_string_tolerant;
use coinfolio_core::utils::time_utils::{parse_storage_timestamp_tolerant, to_storage_timestamp};

/// Database model for assets. Prices are stored as decimal text.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(primary_key(symbol))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub symbol: String,
    pub name: String,
    pub current_price: String,
    pub image_url: Option<String>,
    pub last_updated: String,
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Self {
            current_price: parse_decimal_string_tolerant(&db.current_price, "current_price"),
            last_updated: parse_storage_timestamp_tolerant(&db.last_updated, "last_updated"),
            symbol: db.symbol,
            name: db.name,
            image_url: db.image_url,
        }
    }
}

impl From<Asset> for AssetDB {
    fn from(domain: Asset) -> Self {
        Self {
            symbol: domain.symbol,
            name: domain.name,
            current_price: domain.current_price.to_string(),
            image_url: domain.image_url,
            last_updated: to_storage_timestamp(&domain.last_updated),
        }
    }
}

impl From<NewAsset> for AssetDB {
    fn from(domain: NewAsset) -> Self {
        domain.into_asset(Utc::now()).into()
    }
}
