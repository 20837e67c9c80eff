//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use phish_core::logic::features::SlotErrors;
use phish_core::CoreError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Classifier absent; no inference is attempted
    #[error("model not loaded")]
    ModelUnavailable,

    /// Classifier ready but no usable vectorizer for URL predictions
    #[error("vectorizer not loaded")]
    VectorizerUnavailable,

    #[error("{message}")]
    Validation { message: String, slots: Vec<String> },

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            slots: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::ModelUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded".to_string(), None)
            }
            AppError::VectorizerUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Vectorizer not loaded".to_string(), None)
            }
            AppError::Validation { message, slots } => {
                let details = if slots.is_empty() { None } else { Some(slots) };
                (StatusCode::BAD_REQUEST, message, details)
            }
            AppError::Prediction(msg) => {
                tracing::error!("Prediction error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed".to_string(), None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
        };

        let body = match details {
            Some(details) => json!({
                "error": error_message,
                "details": details,
                "status": status.as_u16()
            }),
            None => json!({
                "error": error_message,
                "status": status.as_u16()
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SlotErrors> for AppError {
    fn from(err: SlotErrors) -> Self {
        AppError::Validation {
            message: err.to_string(),
            slots: err.slot_names(),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Prediction(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}
