//! Record Routes
//!
//! The mutating operations. Mounted under /records behind the operator guard.
//!
//! Routes:
//! - POST /records/food-listings - Add Food Listing
//! - POST /records/claims - Add Claim
//! - PATCH /records/claims/:id - Update Claim Status
//! - DELETE /records/food-listings/:id - Delete Record from food_listings
//! - DELETE /records/claims/:id - Delete Record from claims

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{self, Claim, ClaimStatus, FoodListing, NewClaim, NewFoodListing, RecordTable};
use crate::{AppState, Error, Result};

/// Build record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/food-listings", post(add_food_listing))
        .route("/food-listings/:id", delete(delete_food_listing))
        .route("/claims", post(add_claim))
        .route("/claims/:id", patch(update_claim_status).delete(delete_claim))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ClaimStatus,
}

/// Outcome of an update or delete.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub rows_affected: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /records/food-listings
#[axum::debug_handler]
async fn add_food_listing(
    State(state): State<AppState>,
    Json(input): Json<NewFoodListing>,
) -> Result<(StatusCode, Json<FoodListing>)> {
    require_positive("provider_id", input.provider_id)?;
    require_positive("quantity", input.quantity)?;

    let listing = db::create_food_listing(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// POST /records/claims
#[axum::debug_handler]
async fn add_claim(
    State(state): State<AppState>,
    Json(input): Json<NewClaim>,
) -> Result<(StatusCode, Json<Claim>)> {
    require_positive("food_id", input.food_id)?;
    require_positive("receiver_id", input.receiver_id)?;

    let claim = db::create_claim(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(claim)))
}

/// PATCH /records/claims/:id
///
/// An unknown claim id is not an error: zero rows are affected.
#[axum::debug_handler]
async fn update_claim_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<MutationResponse>> {
    let rows_affected = db::update_claim_status(&state.db, id, request.status).await?;
    Ok(Json(MutationResponse { rows_affected }))
}

/// DELETE /records/food-listings/:id
#[axum::debug_handler]
async fn delete_food_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>> {
    delete_record(&state, RecordTable::FoodListings, id).await
}

/// DELETE /records/claims/:id
#[axum::debug_handler]
async fn delete_claim(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>> {
    delete_record(&state, RecordTable::Claims, id).await
}

async fn delete_record(
    state: &AppState,
    table: RecordTable,
    id: i64,
) -> Result<Json<MutationResponse>> {
    let rows_affected = db::delete_record(&state.db, table, id).await?;
    Ok(Json(MutationResponse { rows_affected }))
}

fn require_positive(field: &str, value: i64) -> Result<()> {
    if value < 1 {
        return Err(Error::Validation(format!(
            "{} must be at least 1, got {}",
            field, value
        )));
    }
    Ok(())
}
