use anyhow::{anyhow, Context, Result};
use log::{error, info};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite,
};
use std::{path::Path, time::Duration};

/// Read-only handle on the pre-populated observations database.
///
/// Constructed once at startup and handed to the query layer; every query
/// checks a connection out with [`Database::acquire`] and gives it back when
/// the returned guard is dropped.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(path: &str, max_connections: u32) -> Result<Self> {
        if !Path::new(path).is_file() {
            return Err(anyhow!("observations database not found at: {}", path));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open observations database: {}", path))?;

        info!("SQLite database opened read-only at: {}", path);

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check out a connection for the duration of one query operation.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await
            .context("Database integrity check failed")?;
        if result != "ok" {
            error!("quick_check reported: {}", result);
            return Err(anyhow!("Database integrity check failed: {}", result));
        }

        Ok(())
    }

    /// Wait for checked-out connections to come back, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite connections closed");
    }
}
