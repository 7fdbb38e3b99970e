//! Overview Route
//!
//! - GET /overview - Row counts per table and the providers-per-city chart

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::{self, TableCounts};
use crate::services::{Report, ReportOutcome};
use crate::{AppState, Result};

pub fn routes() -> Router<AppState> {
    Router::new().route("/overview", get(overview))
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub counts: TableCounts,
    pub top_provider_cities: ReportOutcome,
}

/// GET /overview
#[axum::debug_handler]
async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>> {
    let counts = db::table_counts(&state.db).await?;
    let top_provider_cities = state.reporting.run_report(Report::ProvidersPerCity).await?;

    Ok(Json(OverviewResponse {
        counts,
        top_provider_cities,
    }))
}
