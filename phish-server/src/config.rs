//! Configuration module

use std::env;
use std::path::PathBuf;

use phish_core::constants::{DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Classifier artifact
    pub model_path: PathBuf,

    /// Vectorizer artifact, needed only for URL predictions
    pub vectorizer_path: PathBuf,

    /// Combined dataset export backing `GET /sample`
    pub sample_dataset_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),

            vectorizer_path: env::var("VECTORIZER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_VECTORIZER_PATH)),

            sample_dataset_path: env::var("SAMPLE_DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH)),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
