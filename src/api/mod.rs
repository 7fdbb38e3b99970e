//! API Routes for Surplus
//!
//! This module combines all API routes into a single router.

mod overview;
mod records;
mod reports;
pub mod status;
mod tables;

use axum::Router;

use crate::middleware::{require_operator, track_requests};
use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /health, /status, /metrics - Health checks (public)
/// - /overview - Home page counts and chart (public)
/// - /providers, /receivers, /food-listings, /claims - Table browsing (public)
/// - /reports/* - Report catalogue (public)
/// - /query - Ad-hoc statements (operator)
/// - /records/* - Create, update and delete (operator)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .merge(overview::routes())
        .merge(tables::routes())
        .merge(reports::routes())
        .merge(operator_routes(state))
        .layer(axum::middleware::from_fn(track_requests))
}

/// Routes that change data or run operator statements.
fn operator_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(reports::query_routes())
        .nest("/records", records::routes())
        .layer(axum::middleware::from_fn_with_state(state, require_operator))
}
