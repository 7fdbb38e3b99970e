//! Provider database queries.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

/// Provider record from the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Provider {
    #[sqlx(rename = "Provider_ID")]
    pub provider_id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Type")]
    #[serde(rename = "type")]
    pub provider_type: String,
    #[sqlx(rename = "City")]
    pub city: String,
    #[sqlx(rename = "Contact")]
    pub contact: Option<String>,
}

/// Input for creating a provider.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProvider {
    /// Explicit identity, or `None` to let SQLite assign one.
    pub provider_id: Option<i64>,
    pub name: String,
    pub provider_type: String,
    pub city: String,
    pub contact: Option<String>,
}

/// Create a new provider.
pub async fn create_provider(pool: &DbPool, input: NewProvider) -> Result<Provider> {
    sqlx::query_as::<_, Provider>(
        r#"
        INSERT INTO providers (Provider_ID, Name, Type, City, Contact)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.provider_id)
    .bind(&input.name)
    .bind(&input.provider_type)
    .bind(&input.city)
    .bind(&input.contact)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a provider by ID.
pub async fn get_provider(pool: &DbPool, id: i64) -> Result<Provider> {
    sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE Provider_ID = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Provider not found: {}", id)))
}

/// List providers, optionally restricted to one city.
pub async fn list_providers(pool: &DbPool, city: Option<&str>) -> Result<Vec<Provider>> {
    match city {
        Some(city) => {
            sqlx::query_as::<_, Provider>(
                "SELECT * FROM providers WHERE City = ? ORDER BY Provider_ID",
            )
            .bind(city)
            .fetch_all(pool)
            .await
            .map_err(Error::Database)
        }
        None => sqlx::query_as::<_, Provider>("SELECT * FROM providers ORDER BY Provider_ID")
            .fetch_all(pool)
            .await
            .map_err(Error::Database),
    }
}

/// Distinct provider cities, sorted.
pub async fn provider_cities(pool: &DbPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT City FROM providers ORDER BY City")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}
