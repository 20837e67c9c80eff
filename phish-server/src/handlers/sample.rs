//! Sample feature vector handler

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{AppError, AppResult, AppState};

#[derive(Serialize)]
pub struct SampleResponse {
    sample_features: BTreeMap<String, f32>,
    description: &'static str,
}

/// First row of the combined dataset export
pub async fn get(State(state): State<AppState>) -> AppResult<Json<SampleResponse>> {
    let sample = state
        .model
        .sample()
        .ok_or_else(|| AppError::NotFound("Sample dataset not available".to_string()))?;

    Ok(Json(SampleResponse {
        sample_features: sample.clone(),
        description: "Sample feature vector from dataset",
    }))
}
