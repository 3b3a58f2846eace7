use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use coinfolio_core::assets::{normalize_symbol, Asset, AssetRepositoryTrait, NewAsset};
use coinfolio_core::Result;

use super::model::AssetDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::assets;
use crate::utils::chunk_for_sqlite;

/// Price table repository. Reads go through the pool, writes through the writer actor.
pub struct AssetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AssetRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn upsert_row(conn: &mut SqliteConnection, row: &AssetDB) -> Result<usize> {
        Ok(diesel::insert_into(assets::table)
            .values(row)
            .on_conflict(assets::symbol)
            .do_update()
            .set(row)
            .execute(conn)
            .map_err(StorageError::from)?)
    }
}

#[async_trait]
impl AssetRepositoryTrait for AssetRepository {
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Asset>> {
        let mut conn = get_connection(&self.pool)?;
        let row = assets::table
            .find(normalize_symbol(symbol))
            .select(AssetDB::as_select())
            .first::<AssetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Asset::from))
    }

    fn list(&self) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = assets::table
            .select(AssetDB::as_select())
            .order(assets::symbol.asc())
            .load::<AssetDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Asset::from).collect())
    }

    fn list_by_symbols(&self, symbols: &[String]) -> Result<Vec<Asset>> {
        let normalized: Vec<String> = symbols.iter().map(|s| normalize_symbol(s)).collect();
        let mut conn = get_connection(&self.pool)?;
        let mut found = Vec::with_capacity(normalized.len());
        for chunk in chunk_for_sqlite(&normalized) {
            let rows = assets::table
                .filter(assets::symbol.eq_any(chunk))
                .select(AssetDB::as_select())
                .load::<AssetDB>(&mut conn)
                .map_err(StorageError::from)?;
            found.extend(rows.into_iter().map(Asset::from));
        }
        Ok(found)
    }

    async fn upsert(&self, new_asset: NewAsset) -> Result<Asset> {
        let row: AssetDB = new_asset.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Asset> {
                Self::upsert_row(conn, &row)?;
                Ok(Asset::from(row))
            })
            .await
    }

    async fn upsert_many(&self, new_assets: Vec<NewAsset>) -> Result<usize> {
        let rows: Vec<AssetDB> = new_assets.into_iter().map(AssetDB::from).collect();
        let written = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected = 0;
                for row in &rows {
                    affected += Self::upsert_row(conn, row)?;
                }
                Ok(affected)
            })
            .await?;
        debug!("Upserted {} asset row(s)", written);
        Ok(written)
    }
}
