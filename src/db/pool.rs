//! SQLite connection pool configuration and utilities.
//!
//! Every store operation acquires one connection from the pool, runs a
//! single statement and hands the connection back when it completes.

use crate::config::DatabaseConfig;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use tracing::info;

use super::DbPool;

/// Build the connection options for SQLite.
///
/// Foreign keys stay off: references are expected to be valid but are not
/// enforced at this layer.
pub fn build_connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(&config.path)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(config.busy_timeout)
        .foreign_keys(false)
        .pragma("temp_store", "memory");

    Ok(options)
}

/// Create a pool for the configured database file.
///
/// Creates parent directories if needed.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    if let Some(parent) = std::path::Path::new(&config.path).parent() {
        if !parent.as_os_str().is_empty() && !config.path.starts_with(':') {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = build_connect_options(config)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(config.busy_timeout)
        .connect_with(options)
        .await?;

    info!("Database pool initialized: {}", config.path);

    Ok(pool)
}

/// Health check for the database connection.
pub async fn health_check(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Pool statistics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

pub fn get_pool_stats(pool: &DbPool) -> PoolStats {
    PoolStats {
        size: pool.size(),
        idle: pool.num_idle() as u32,
        max_connections: pool.options().get_max_connections(),
    }
}
