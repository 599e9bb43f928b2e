//! Connection pool handle
//!
//! One `Database` is created at startup and shared through the application
//! state. Every request checks out a pooled connection for the duration of a
//! single closure; the connection goes back to the pool when the closure
//! returns, on success and on error alike.
//!
//! SQLite calls are blocking, so closures run on tokio's blocking pool.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::StorageResult;
use super::schema;

/// Pool settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite file path
    pub path: PathBuf,
    /// Maximum number of pooled connections
    pub pool_size: u32,
    /// How long a checkout may wait for a free connection
    pub connection_timeout: Duration,
    /// Idle connections older than this are closed and reopened
    pub idle_timeout: Duration,
    /// How long SQLite waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lifeboard.db"),
            pool_size: 8,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(280),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseConfig {
    /// Config for a database file with default pool settings
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
}

/// Process-wide database handle
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl Database {
    /// Open the pool and make sure the schema exists
    pub fn open(config: &DatabaseConfig) -> StorageResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        });

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .test_on_check_out(true)
            .build(manager)?;

        let db = Self {
            pool,
            path: config.path.clone(),
        };

        {
            let conn = db.pool.get()?;
            schema::create_all(&conn)?;
        }

        tracing::info!(path = ?db.path, pool_size = config.pool_size, "Database ready");
        Ok(db)
    }

    /// Path of the underlying SQLite file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connections currently idle / open
    pub fn pool_state(&self) -> (u32, u32) {
        let state = self.pool.state();
        (state.idle_connections, state.connections)
    }

    fn conn(&self) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run a read-only closure on a pooled connection
    pub async fn read<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.conn()?;
            f(&conn)
        })
        .await?
    }

    /// Run a closure inside an immediate write transaction
    ///
    /// Commits when the closure returns `Ok`; any error drops the transaction,
    /// which rolls back every statement it ran.
    pub async fn write<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.conn()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await?
    }

    /// Cheap round trip used by readiness probes
    pub async fn ping(&self) -> StorageResult<()> {
        self.read(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
