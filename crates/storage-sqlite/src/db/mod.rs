//! Connection pool, migrations and the single-writer actor.

pub mod write_actor;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};

use crate::errors::{IntoCore, StorageError};
use coinfolio_core::config::LedgerConfig;
use coinfolio_core::errors::{DatabaseError, Error, Result};

pub use write_actor::{spawn_writer, WriteHandle};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Applied to every pooled connection when it is opened.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Creates the parent directory of `db_path` if needed and returns the path unchanged.
pub fn init(db_path: &str) -> Result<String> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Database(DatabaseError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }
    }
    Ok(db_path.to_string())
}

pub fn create_pool(db_path: &str, max_size: u32) -> Result<Arc<DbPool>> {
    debug!("Creating database pool for {} (max {})", db_path, max_size);
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &Arc<DbPool>) -> Result<DbConnection> {
    pool.get().into_core()
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().into_core()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
    if applied.is_empty() {
        debug!("Database schema is up to date");
    } else {
        info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}

/// Storage handles shared by the repositories.
pub struct Database {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
}

/// Prepares the database file, migrates it and starts the writer actor.
/// Must be called from within a tokio runtime.
pub fn open(config: &LedgerConfig) -> Result<Database> {
    let db_path = init(&config.db_path)?;
    let pool = create_pool(&db_path, config.pool_max_size)?;
    run_migrations(&pool)?;
    let writer = spawn_writer(pool.as_ref().clone())?;
    info!("Opened ledger database at {}", db_path);
    Ok(Database { pool, writer })
}
