//! PhishGuard Prediction Server
//!
//! Serves a trained random forest over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PHISHGUARD SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐  │
//! │  │  API      │  │  Validation   │  │  URL Extraction     │  │
//! │  │  (Axum)   │  │  (47 slots)   │  │  + TF-IDF           │  │
//! │  └─────┬─────┘  └───────┬───────┘  └──────────┬──────────┘  │
//! │        └────────────────┼─────────────────────┘             │
//! │                         ▼                                   │
//! │                ┌─────────────────┐                          │
//! │                │  ModelState     │  (loaded once, Arc)      │
//! │                └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod state;


use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
pub use state::{AppState, ModelState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "phish_server=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("PhishGuard server starting ({})", config.environment);

    let model = ModelState::load(&config);
    if !model.is_ready() {
        tracing::warn!("Serving in degraded mode: predictions will return 503");
    }

    let state = AppState {
        model: Arc::new(model),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/sample", get(handlers::sample::get))
        .route("/api/predict", post(handlers::predict::features))
        .route("/predict", post(handlers::predict::features))
        .route("/api/predict/url", post(handlers::predict::url))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
