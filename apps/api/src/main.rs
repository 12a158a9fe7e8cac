mod config;
mod db;
mod errors;
mod interview;
mod job;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hirewise API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (job application tracker)
    let db = create_pool(&config.database_url).await?;

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI routes will fail until it is configured");
    }

    let state = AppState::new(db, config.clone())?;
    info!(
        "LLM client initialized (active model: {}, {} candidates)",
        state.llm.orchestrator().selector().active_model(),
        config.gemini_models.len()
    );

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins to the web client's host
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
