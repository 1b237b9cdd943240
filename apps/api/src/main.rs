mod config;
mod errors;
mod extraction;
mod keywords;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::pipeline::Pipeline;
use crate::extraction::skills::RecognizerRegistry;
use crate::keywords::KeywordDatabase;
use crate::llm_client::OracleClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Keyword database (missing or broken file → empty tables, classifier defaults)
    let keywords = Arc::new(KeywordDatabase::load(&config.keyword_db_path));
    if keywords.is_empty() {
        warn!(
            "Keyword database at '{}' is empty; skills and classification will be limited",
            config.keyword_db_path
        );
    }

    // Generative oracle
    let oracle = OracleClient::new(
        config.oracle_url.clone(),
        config.oracle_model.clone(),
        config.oracle_timeout,
    )?;
    info!("Oracle client initialized (model: {}, endpoint: {})", oracle.model(), oracle.endpoint());

    // Entity recognizers load lazily per language on first use
    let recognizers = Arc::new(RecognizerRegistry::with_pattern_recognizers());

    let pipeline = Pipeline::new(
        Arc::new(oracle),
        keywords,
        recognizers,
        config.rewrite_concurrency,
    );
    info!(
        "Pipeline ready (default strategy: {}, rewrite concurrency: {})",
        config.default_strategy, config.rewrite_concurrency
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
