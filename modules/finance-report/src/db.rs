use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};
use tokio::sync::{Mutex, MutexGuard};

/// Handle to the transient in-memory ledger store
///
/// An in-memory SQLite database lives only as long as its connection, so
/// the pool holds exactly one connection that never idles out. Every
/// report acquires that connection once, which makes the connection the
/// request-scoped session: concurrent reports queue instead of
/// interleaving their reads.
///
/// Cloning is cheap; clones share the same database.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    load_state: Arc<Mutex<bool>>,
}

impl Store {
    /// Create an empty in-memory store with the ledger schema applied
    pub async fn connect_in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!("In-memory ledger store created");

        Ok(Store {
            pool,
            load_state: Arc::new(Mutex::new(false)),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open the session used for one report generation
    pub async fn session(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Serialises bulk loads; the guarded flag records a completed load
    pub(crate) async fn lock_load_state(&self) -> MutexGuard<'_, bool> {
        self.load_state.lock().await
    }

    /// Liveness check used by the readiness endpoint
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
