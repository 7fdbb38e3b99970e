//! Database layer for Surplus.
//!
//! Provides the SQLite connection pool and query modules
//! for the four dataset tables.

mod claims;
mod food_listings;
mod pool;
mod providers;
mod receivers;
mod records;
mod tabular;

pub use claims::*;
pub use food_listings::*;
pub use pool::*;
pub use providers::*;
pub use receivers::*;
pub use records::*;
pub use tabular::*;

use crate::config::DatabaseConfig;
use crate::Result;
use serde::Serialize;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool with default settings.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    create_pool(&DatabaseConfig {
        path: path.to_string(),
        ..DatabaseConfig::default()
    })
    .await
}

/// Initialize the database schema.
///
/// Applies schema.sql. Uses IF NOT EXISTS clauses so it's safe to run
/// against an existing dataset file.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

/// Treat an absent, blank or `All` filter value as "no filter".
///
/// `All` is the catch-all entry offered by the filter dropdowns.
pub fn normalize_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Row counts shown on the overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub providers: i64,
    pub receivers: i64,
    pub food_listings: i64,
    pub claims: i64,
}

/// Count the rows of every dataset table.
pub async fn table_counts(pool: &DbPool) -> Result<TableCounts> {
    let (providers, receivers, food_listings, claims): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM providers),
            (SELECT COUNT(*) FROM receivers),
            (SELECT COUNT(*) FROM food_listings),
            (SELECT COUNT(*) FROM claims)
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(TableCounts {
        providers,
        receivers,
        food_listings,
        claims,
    })
}
