mod admin;
mod applications;
mod auth;
mod catalog;
mod config;
mod db;
mod errors;
mod jobs;
mod matching;
mod models;
mod partners;
mod profiles;
mod resources;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::session::purge_expired_sessions;
use crate::auth::users::bootstrap_admin;
use crate::catalog::sample::seed_sample_data;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::matching::KeywordMatchScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Inua Stude API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&db).await?;

    purge_expired_sessions(&db).await?;

    if let Some(admin) = &config.admin_bootstrap {
        bootstrap_admin(&db, &config.password_pepper, admin).await?;
    }

    if config.seed_sample_data {
        seed_sample_data(&db).await?;
        info!("Sample data check complete");
    }

    let cors = build_cors(&config)?;

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        match_scorer: Arc::new(KeywordMatchScorer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to `CORS_ALLOWED_ORIGIN` when set; permissive otherwise.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    match &config.cors_allowed_origin {
        Some(origin) => {
            info!("CORS restricted to {origin}");
            Ok(CorsLayer::new()
                .allow_origin(origin.parse::<HeaderValue>()?)
                .allow_methods(Any)
                .allow_headers(Any))
        }
        None => Ok(CorsLayer::permissive()),
    }
}
