//! Health check handler

use axum::{extract::State, Json};
use phish_core::logic::features::layout::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model_loaded: bool,
    vectorizer_loaded: bool,
    feature_version: u8,
    layout_hash: String,
    feature_count: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.model.is_ready();
    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model_loaded,
        vectorizer_loaded: state.model.has_vectorizer(),
        feature_version: FEATURE_VERSION,
        layout_hash: format!("{:08x}", layout_hash()),
        feature_count: FEATURE_COUNT,
    })
}
