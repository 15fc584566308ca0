//! # Database Pool Management
//!
//! Opens the register's SQLite file and brings its schema up to date.
//!
//! ## Open Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Database::new(config)                            │
//! │                                                                         │
//! │  RegisterConfig [database]                                              │
//! │       │  path, max_connections, busy_timeout_ms                         │
//! │       ▼                                                                 │
//! │  DbConfig::new(path).max_connections(n).busy_timeout(d)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteConnectOptions                                                   │
//! │    journal_mode = WAL        reports can read during a checkout         │
//! │    synchronous  = NORMAL                                                │
//! │    busy_timeout = d          wait on a locked file instead of failing   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePool (1..=max_connections)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  embedded migrations ──► db.orders() / db.transactions()                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::OrderRepository;
use crate::repository::transaction::TransactionRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how the pool talks to it.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/pizzeria/pizzeria.db")
///     .max_connections(2)
///     .busy_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// SQLite file, created if missing.
    pub database_path: PathBuf,

    /// Pool size. Default: 2
    pub max_connections: u32,

    /// How long a statement waits on a locked file. Default: 5 seconds
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;
    pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Self::DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Sets the pool size. Zero is raised to one.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// An isolated, empty database for tests.
    ///
    /// Every pooled connection to `:memory:` would be its own database, so the
    /// pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig::new(IN_MEMORY_PATH).max_connections(1)
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(busy_timeout = ?config.busy_timeout, "Database pool created");

        migrations::run_migrations(&pool).await?;

        let (total, applied) = migrations::migration_status(&pool).await?;
        if applied < total {
            warn!(total, applied, "Database schema behind embedded migrations");
        } else {
            info!(applied, "Database schema up to date");
        }

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
