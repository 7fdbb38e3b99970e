//! Middleware for Surplus.
//!
//! - `operator_auth` - bearer token guard for mutating and ad-hoc routes
//! - `track_requests` - request and error counters for /status and /metrics

mod operator_auth;

pub use operator_auth::require_operator;

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use crate::api::status::{inc_error_count, inc_request_count};

/// Count every request, and every response with a 5xx status.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    inc_request_count();
    let response = next.run(req).await;
    if response.status().is_server_error() {
        inc_error_count();
    }
    response
}
