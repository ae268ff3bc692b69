//! SheetGenie Backend
//!
//! A REST backend that regenerates the columns and rows of a Smartsheet sheet
//! from natural-language prompts, orchestrating a chat-completion service and
//! the document service.

mod api;
mod clients;
mod config;
mod errors;
mod generate;
mod models;
mod orchestrator;
mod sync;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use orchestrator::Orchestrator;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SheetGenie Backend");
    tracing::info!("Completion service: {}", config.openai_base_url);
    tracing::info!("Document service: {}", config.smartsheet_base_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not configured. Generation requests will fail!");
    }
    if config.smartsheet_api_key.is_empty() {
        tracing::warn!("SMARTSHEET_API_KEY is not configured. Sheet requests will fail!");
    }

    let orchestrator = Arc::new(Orchestrator::from_config(&config));

    let state = AppState {
        orchestrator,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/verify_sheet", post(api::verify_sheet))
        .route("/generate_columns", post(api::generate_columns))
        .route("/push_columns", post(api::push_columns))
        .route("/generate_data", post(api::generate_data))
        .route("/push_data", post(api::push_data))
        .route("/regenerate", post(api::regenerate))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
