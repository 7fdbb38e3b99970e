//! Report Routes
//!
//! Routes:
//! - GET /reports - List the report catalogue
//! - GET /reports/:key - Run a report
//! - POST /query - Run an ad-hoc statement (operator)

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::services::{catalogue, RenderedResult, Report, ReportOutcome, ReportSummary};
use crate::{AppState, Error, Result};

/// Build catalogue routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/:key", get(run_report))
}

/// Build the ad-hoc query route. Mounted behind the operator guard.
pub fn query_routes() -> Router<AppState> {
    Router::new().route("/query", post(run_adhoc_query))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CatalogueResponse {
    pub reports: Vec<ReportSummary>,
}

/// Ad-hoc statement request.
#[derive(Debug, Deserialize)]
pub struct AdhocQueryRequest {
    pub sql: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /reports
#[axum::debug_handler]
async fn list_reports() -> Json<CatalogueResponse> {
    Json(CatalogueResponse {
        reports: catalogue(),
    })
}

/// GET /reports/:key
#[axum::debug_handler]
async fn run_report(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ReportOutcome>> {
    let report = Report::from_key(&key)
        .ok_or_else(|| Error::NotFound(format!("Report not found: {}", key)))?;

    let outcome = state.reporting.run_report(report).await?;
    Ok(Json(outcome))
}

/// POST /query
///
/// Statement errors are returned as 400 with SQLite's message.
#[axum::debug_handler]
async fn run_adhoc_query(
    State(state): State<AppState>,
    Json(request): Json<AdhocQueryRequest>,
) -> Result<Json<RenderedResult>> {
    let result = state.reporting.run_adhoc(&request.sql).await?;
    Ok(Json(result))
}
