//! Table Routes
//!
//! Browsing of the four dataset tables with their filters.
//!
//! Routes:
//! - GET /providers?city= - Providers, optionally in one city
//! - GET /receivers?city= - Receivers, optionally in one city
//! - GET /food-listings?location=&meal_type= - Food listings
//! - GET /claims?status= - Claims, optionally with one status
//!
//! A filter value of `All` means no filter. Each response also carries
//! the options for its filters, taken from the full table.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{self, Claim, ClaimStatus, FoodListing, ListingFilter, Provider, Receiver};
use crate::{AppState, Result};

/// Build table routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/providers", get(list_providers))
        .route("/receivers", get(list_receivers))
        .route("/food-listings", get(list_food_listings))
        .route("/claims", get(list_claims))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct CityQuery {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClaimsQuery {
    pub status: Option<String>,
}

/// Rows of a table plus the options for its filters.
#[derive(Debug, Serialize)]
pub struct TableResponse<T, F> {
    pub rows: Vec<T>,
    pub total: usize,
    pub filters: F,
}

impl<T, F> TableResponse<T, F> {
    fn new(rows: Vec<T>, filters: F) -> Self {
        Self {
            total: rows.len(),
            rows,
            filters,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CityFilters {
    pub city: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingFilters {
    pub location: Vec<String>,
    pub meal_type: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusFilters {
    pub status: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /providers
#[axum::debug_handler]
async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<TableResponse<Provider, CityFilters>>> {
    let city = db::normalize_filter(query.city.as_deref());
    let rows = db::list_providers(&state.db, city).await?;
    let cities = db::provider_cities(&state.db).await?;

    Ok(Json(TableResponse::new(rows, CityFilters { city: cities })))
}

/// GET /receivers
#[axum::debug_handler]
async fn list_receivers(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<TableResponse<Receiver, CityFilters>>> {
    let city = db::normalize_filter(query.city.as_deref());
    let rows = db::list_receivers(&state.db, city).await?;
    let cities = db::receiver_cities(&state.db).await?;

    Ok(Json(TableResponse::new(rows, CityFilters { city: cities })))
}

/// GET /food-listings
#[axum::debug_handler]
async fn list_food_listings(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<TableResponse<FoodListing, ListingFilters>>> {
    let rows = db::list_food_listings(&state.db, &filter).await?;
    let filters = ListingFilters {
        location: db::listing_locations(&state.db).await?,
        meal_type: db::listing_meal_types(&state.db).await?,
    };

    Ok(Json(TableResponse::new(rows, filters)))
}

/// GET /claims
#[axum::debug_handler]
async fn list_claims(
    State(state): State<AppState>,
    Query(query): Query<ClaimsQuery>,
) -> Result<Json<TableResponse<Claim, StatusFilters>>> {
    let status = db::normalize_filter(query.status.as_deref())
        .map(str::parse::<ClaimStatus>)
        .transpose()?;

    let rows = db::list_claims(&state.db, status).await?;
    let statuses = db::claim_statuses(&state.db).await?;

    Ok(Json(TableResponse::new(rows, StatusFilters { status: statuses })))
}
