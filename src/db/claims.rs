//! Claim database queries.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;

use super::DbPool;

/// Claim status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "completed")]
    Completed,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 2] = [ClaimStatus::Pending, ClaimStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(Error::InvalidInput(format!("Unknown claim status: {}", s))),
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim record from the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Claim {
    #[sqlx(rename = "Claim_ID")]
    pub claim_id: i64,
    #[sqlx(rename = "Food_ID")]
    pub food_id: i64,
    #[sqlx(rename = "Receiver_ID")]
    pub receiver_id: i64,
    #[sqlx(rename = "Status")]
    pub status: String,
}

impl Claim {
    pub fn status_enum(&self) -> Option<ClaimStatus> {
        self.status.parse().ok()
    }
}

/// Input for the Add Claim operation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClaim {
    pub food_id: i64,
    pub receiver_id: i64,
    pub status: ClaimStatus,
}

/// Insert a new claim with the caller's initial status.
pub async fn create_claim(pool: &DbPool, input: NewClaim) -> Result<Claim> {
    let claim = sqlx::query_as::<_, Claim>(
        r#"
        INSERT INTO claims (Food_ID, Receiver_ID, Status)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.food_id)
    .bind(input.receiver_id)
    .bind(input.status.as_str())
    .fetch_one(pool)
    .await?;

    info!(claim_id = claim.claim_id, status = %input.status, "Claim added");

    Ok(claim)
}

/// Get a claim by ID.
pub async fn get_claim(pool: &DbPool, id: i64) -> Result<Claim> {
    sqlx::query_as::<_, Claim>("SELECT * FROM claims WHERE Claim_ID = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Claim not found: {}", id)))
}

/// Set the status of a claim.
///
/// Returns the number of rows affected; an unknown id affects zero rows
/// and is not an error.
pub async fn update_claim_status(pool: &DbPool, id: i64, status: ClaimStatus) -> Result<u64> {
    let result = sqlx::query("UPDATE claims SET Status = ? WHERE Claim_ID = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    info!(
        claim_id = id,
        status = %status,
        rows_affected = result.rows_affected(),
        "Claim status updated"
    );

    Ok(result.rows_affected())
}

/// List claims, optionally restricted to one status.
pub async fn list_claims(pool: &DbPool, status: Option<ClaimStatus>) -> Result<Vec<Claim>> {
    match status {
        Some(s) => sqlx::query_as::<_, Claim>(
            "SELECT * FROM claims WHERE Status = ? ORDER BY Claim_ID",
        )
        .bind(s.as_str())
        .fetch_all(pool)
        .await
        .map_err(Error::Database),
        None => sqlx::query_as::<_, Claim>("SELECT * FROM claims ORDER BY Claim_ID")
            .fetch_all(pool)
            .await
            .map_err(Error::Database),
    }
}

/// Distinct statuses present in the claims table, sorted.
pub async fn claim_statuses(pool: &DbPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT Status FROM claims ORDER BY Status")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}
