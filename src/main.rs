//! Surplus - reporting service for surplus food donations.
//!
//! Serves table browsing, predefined reports, ad-hoc queries and record
//! maintenance over the donation dataset.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use surplus::config::{self, LogFormat};
use surplus::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::init();

    init_tracing(config.logging.format);

    tracing::info!(
        "Starting Surplus server on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        database = %config.database.path,
        adhoc_query_mode = config.query.adhoc_mode.as_str(),
        operator_token = config.auth.operator_token.is_some(),
        "Configuration loaded"
    );

    // Initialize application state
    let state = AppState::new()
        .await
        .with_context(|| format!("failed to open database {}", config.database.path))?;
    tracing::info!("Application state initialized");

    // Build router
    let app = Router::new()
        .merge(api::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid HOST/PORT")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "surplus=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
