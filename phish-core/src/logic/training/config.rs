use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATASET_PATH, DEFAULT_LEGITIMATE_PATH, DEFAULT_MODEL_PATH, DEFAULT_PHISHING_PATH,
    DEFAULT_VECTORIZER_PATH,
};
use crate::logic::model::ForestParams;
use crate::logic::text::TfidfParams;

/// Training Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// CSV with a `url` column, every row labeled phishing
    pub phishing_path: PathBuf,

    /// CSV with a `url` column, every row labeled legitimate
    pub legitimate_path: PathBuf,

    /// Classifier artifact output
    pub model_path: PathBuf,

    /// Vectorizer artifact output
    pub vectorizer_path: PathBuf,

    /// Combined dataset export
    pub dataset_path: PathBuf,

    pub forest: ForestParams,

    pub text: TfidfParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            phishing_path: PathBuf::from(DEFAULT_PHISHING_PATH),
            legitimate_path: PathBuf::from(DEFAULT_LEGITIMATE_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            vectorizer_path: PathBuf::from(DEFAULT_VECTORIZER_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            forest: ForestParams::default(),
            text: TfidfParams::for_layout(),
        }
    }
}
