//! Error handling

use thiserror::Error;

use crate::logic::features::layout::LayoutMismatchError;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { column: String, path: String },

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Empty vocabulary: documents produced no n-grams")]
    EmptyVocabulary,

    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParams(String),

    #[error("Model not fitted")]
    NotFitted,
}
