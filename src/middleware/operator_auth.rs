//! Operator token middleware.
//!
//! Guards the routes that change data or run ad-hoc statements. When an
//! operator token is configured, requests must carry
//! `Authorization: Bearer {token}`; without one the routes stay open.
//!
//! Tokens are compared by SHA-256 digest in constant time.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::{error::Error, AppState};

/// Extract the bearer token from the Authorization header.
fn extract_bearer(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Middleware that requires the operator token, if one is configured.
///
/// # Errors
///
/// Returns 401 Unauthorized if a token is configured and the request
/// carries no bearer token or a different one.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use surplus::middleware::require_operator;
///
/// let app = Router::new()
///     .route("/query", post(run_adhoc_query))
///     .layer(middleware::from_fn_with_state(state.clone(), require_operator));
/// ```
pub async fn require_operator(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let Some(expected) = state.auth.operator_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let presented = extract_bearer(&req).ok_or(Error::Unauthenticated)?;

    if !constant_time_eq(&hash_token(presented), &hash_token(expected)) {
        tracing::warn!("Rejected operator request with invalid token");
        return Err(Error::Unauthenticated);
    }

    Ok(next.run(req).await)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
