//! Record deletion across the mutable tables.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::DbPool;

/// Tables that accept the Delete Record operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTable {
    FoodListings,
    Claims,
}

impl RecordTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::FoodListings => "food_listings",
            Self::Claims => "claims",
        }
    }

    pub fn id_column(&self) -> &'static str {
        match self {
            Self::FoodListings => "Food_ID",
            Self::Claims => "Claim_ID",
        }
    }
}

impl std::str::FromStr for RecordTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.replace('-', "_").as_str() {
            "food_listings" => Ok(Self::FoodListings),
            "claims" => Ok(Self::Claims),
            _ => Err(Error::InvalidInput(format!(
                "Records can only be deleted from food_listings or claims, not {}",
                s
            ))),
        }
    }
}

/// Delete one row by identity.
///
/// Table and id column come from the closed `RecordTable` set; only the id
/// is bound. Returns the number of rows removed (zero when already gone).
pub async fn delete_record(pool: &DbPool, table: RecordTable, id: i64) -> Result<u64> {
    let query = format!(
        "DELETE FROM {} WHERE {} = ?",
        table.table_name(),
        table.id_column()
    );

    let result = sqlx::query(&query).bind(id).execute(pool).await?;

    info!(
        table = table.table_name(),
        id,
        rows_affected = result.rows_affected(),
        "Record deleted"
    );

    Ok(result.rows_affected())
}
