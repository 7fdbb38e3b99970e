//! Food listing database queries.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::info;

use super::DbPool;

/// Food listing record from the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct FoodListing {
    #[sqlx(rename = "Food_ID")]
    pub food_id: i64,
    #[sqlx(rename = "Provider_ID")]
    pub provider_id: i64,
    #[sqlx(rename = "Food_Name")]
    pub food_name: String,
    #[sqlx(rename = "Food_Type")]
    pub food_type: String,
    #[sqlx(rename = "Quantity")]
    pub quantity: i64,
    #[sqlx(rename = "Meal_Type")]
    pub meal_type: String,
    #[sqlx(rename = "Location")]
    pub location: String,
    /// ISO date (`YYYY-MM-DD`).
    #[sqlx(rename = "Expiry_Date")]
    pub expiry_date: String,
}

/// Input for the Add Food Listing operation.
///
/// `provider_id` and `quantity` are checked to be at least 1 by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFoodListing {
    pub provider_id: i64,
    pub food_name: String,
    pub food_type: String,
    pub quantity: i64,
    pub meal_type: String,
    pub location: String,
    pub expiry_date: NaiveDate,
}

/// Filters for the food listings view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    pub location: Option<String>,
    pub meal_type: Option<String>,
}

/// Insert a new food listing.
pub async fn create_food_listing(pool: &DbPool, input: NewFoodListing) -> Result<FoodListing> {
    let listing = sqlx::query_as::<_, FoodListing>(
        r#"
        INSERT INTO food_listings (Provider_ID, Food_Name, Food_Type, Quantity, Meal_Type, Location, Expiry_Date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(input.provider_id)
    .bind(&input.food_name)
    .bind(&input.food_type)
    .bind(input.quantity)
    .bind(&input.meal_type)
    .bind(&input.location)
    .bind(input.expiry_date.format("%Y-%m-%d").to_string())
    .fetch_one(pool)
    .await?;

    info!(food_id = listing.food_id, "Food listing added");

    Ok(listing)
}

/// Get a food listing by ID.
pub async fn get_food_listing(pool: &DbPool, id: i64) -> Result<FoodListing> {
    sqlx::query_as::<_, FoodListing>("SELECT * FROM food_listings WHERE Food_ID = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Food listing not found: {}", id)))
}

/// List food listings matching the filter.
pub async fn list_food_listings(pool: &DbPool, filter: &ListingFilter) -> Result<Vec<FoodListing>> {
    let mut conditions = Vec::new();
    let mut bindings: Vec<&str> = Vec::new();

    if let Some(location) = super::normalize_filter(filter.location.as_deref()) {
        conditions.push("Location = ?");
        bindings.push(location);
    }
    if let Some(meal_type) = super::normalize_filter(filter.meal_type.as_deref()) {
        conditions.push("Meal_Type = ?");
        bindings.push(meal_type);
    }

    let query = if conditions.is_empty() {
        "SELECT * FROM food_listings ORDER BY Food_ID".to_string()
    } else {
        format!(
            "SELECT * FROM food_listings WHERE {} ORDER BY Food_ID",
            conditions.join(" AND ")
        )
    };

    let mut q = sqlx::query_as::<_, FoodListing>(&query);
    for binding in bindings {
        q = q.bind(binding);
    }

    q.fetch_all(pool).await.map_err(Error::Database)
}

/// Distinct listing locations, sorted.
pub async fn listing_locations(pool: &DbPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT Location FROM food_listings ORDER BY Location")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}

/// Distinct meal types, sorted.
pub async fn listing_meal_types(pool: &DbPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT Meal_Type FROM food_listings ORDER BY Meal_Type",
    )
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}
