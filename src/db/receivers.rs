//! Receiver database queries.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

/// Receiver record from the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Receiver {
    #[sqlx(rename = "Receiver_ID")]
    pub receiver_id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "City")]
    pub city: String,
    #[sqlx(rename = "Contact")]
    pub contact: Option<String>,
}

/// Input for creating a receiver.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReceiver {
    pub receiver_id: Option<i64>,
    pub name: String,
    pub city: String,
    pub contact: Option<String>,
}

/// Create a new receiver.
pub async fn create_receiver(pool: &DbPool, input: NewReceiver) -> Result<Receiver> {
    sqlx::query_as::<_, Receiver>(
        r#"
        INSERT INTO receivers (Receiver_ID, Name, City, Contact)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.receiver_id)
    .bind(&input.name)
    .bind(&input.city)
    .bind(&input.contact)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// List receivers, optionally restricted to one city.
pub async fn list_receivers(pool: &DbPool, city: Option<&str>) -> Result<Vec<Receiver>> {
    match city {
        Some(city) => {
            sqlx::query_as::<_, Receiver>(
                "SELECT * FROM receivers WHERE City = ? ORDER BY Receiver_ID",
            )
            .bind(city)
            .fetch_all(pool)
            .await
            .map_err(Error::Database)
        }
        None => sqlx::query_as::<_, Receiver>("SELECT * FROM receivers ORDER BY Receiver_ID")
            .fetch_all(pool)
            .await
            .map_err(Error::Database),
    }
}

pub async fn receiver_cities(pool: &DbPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT City FROM receivers ORDER BY City")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}
