//! # Store Database
//!
//! Opens the SQLite file behind the store service and brings its schema up
//! to date before handing out a [`Database`].
//!
//! ## Opening Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ServerConfig { database_path, db_max_connections }                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path).max_connections(n)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new ──► file created if missing, WAL journal                 │
//! │       │       ──► SqlitePool (up to n connections)                      │
//! │       │       ──► embedded migrations from migrations/sqlite            │
//! │       ▼                                                                 │
//! │  db.store() ──► StoreRepository (GET /data, PUT /{section}, ...)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets `GET /data` read while a section write is in flight. An
//! in-memory database lives on one connection that the pool never retires.

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::store::StoreRepository;

/// Schema applied on open. Add files, never edit applied ones.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

const IN_MEMORY_PATH: &str = ":memory:";

/// How long a request waits for a free connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives and how many connections may reach it.
///
/// ## Example
/// ```rust
/// use devis_db::DbConfig;
///
/// let config = DbConfig::new("/var/lib/devis/store.db").max_connections(8);
/// assert_eq!(config.max_connections, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// Default: 5
    pub max_connections: u32,
}

impl DbConfig {
    /// File-backed store at `path`. The file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Private store that disappears with the [`Database`]. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);

        if self.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(self.max_connections)
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle on the store database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        MIGRATOR.run(&pool).await?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            migrations = MIGRATOR.migrations.len(),
            "Store database ready"
        );
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Section reads and writes.
    pub fn store(&self) -> StoreRepository {
        StoreRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later operations fail.
    pub async fn close(&self) {
        info!("Closing store database");
        self.pool.close().await;
    }

    /// True while the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
