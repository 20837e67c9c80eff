//! Prediction handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use phish_core::logic::features::{assemble, extract, FeatureVectorBuilder};

use crate::models::{PredictRequest, PredictResponse, UrlPredictRequest};
use crate::{AppError, AppResult, AppState};

/// Classify a caller-supplied feature map
pub async fn features(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let classifier = state.model.classifier()?;
    let Json(req) = payload?;

    let features = req
        .features
        .ok_or_else(|| AppError::validation("Missing features in request"))?;
    let vector = assemble(&features)?;

    let prediction = classifier.predict(&vector)?;
    tracing::debug!(
        label = %prediction.label,
        confidence = prediction.confidence,
        inference_time_us = prediction.inference_time_us,
        "Feature prediction"
    );

    Ok(Json(PredictResponse::new(&prediction, req.include_probabilities)))
}

/// Extract, vectorize and classify a raw URL
pub async fn url(
    State(state): State<AppState>,
    payload: Result<Json<UrlPredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let classifier = state.model.classifier()?;
    let vectorizer = state.model.vectorizer()?;
    let Json(req) = payload?;

    if req.url.is_empty() {
        return Err(AppError::validation("Missing url in request"));
    }

    let vector = FeatureVectorBuilder::new()
        .with(&extract(&req.url))
        .with(&vectorizer.text_features(&req.url)?)
        .build();

    let prediction = classifier.predict(&vector)?;
    tracing::debug!(
        label = %prediction.label,
        confidence = prediction.confidence,
        inference_time_us = prediction.inference_time_us,
        "URL prediction"
    );

    Ok(Json(
        PredictResponse::new(&prediction, req.include_probabilities)
            .with_features(vector.to_named_map()),
    ))
}
