//! Application state for Surplus.
//!
//! Contains the shared state that is passed to all handlers.

use std::time::Instant;

use crate::config::{AuthConfig, Config, QueryConfig};
use crate::db::DbPool;
use crate::services::ReportingService;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Report and ad-hoc query execution.
    pub reporting: ReportingService,
    /// Operator route protection.
    pub auth: AuthConfig,
    /// When the state was built, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Create the application state from the global configuration.
    ///
    /// Opens the database and applies the schema.
    pub async fn new() -> Result<Self> {
        let config = config::config();
        Self::from_config(config).await
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database).await?;
        crate::db::initialize_schema(&db).await?;

        Ok(Self::with_pool(
            db,
            config.query.clone(),
            config.auth.clone(),
        ))
    }

    /// Build state around an existing pool.
    pub fn with_pool(db: DbPool, query: QueryConfig, auth: AuthConfig) -> Self {
        let reporting = ReportingService::new(db.clone(), query);

        Self {
            db,
            reporting,
            auth,
            started_at: Instant::now(),
        }
    }
}
