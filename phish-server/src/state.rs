//! Loaded artifacts shared by every handler

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use phish_core::logic::dataset::read_sample;
use phish_core::logic::model::PhishClassifier;
use phish_core::logic::text::TfidfVectorizer;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Outcome of the startup load. Never changes afterwards.
#[derive(Debug)]
pub enum ClassifierState {
    Ready(PhishClassifier),
    Degraded { reason: String },
}

/// Classifier, optional vectorizer and optional sample row
#[derive(Debug)]
pub struct ModelState {
    classifier: ClassifierState,
    vectorizer: Option<TfidfVectorizer>,
    sample: Option<BTreeMap<String, f32>>,
}

impl ModelState {
    pub fn new(
        classifier: ClassifierState,
        vectorizer: Option<TfidfVectorizer>,
        sample: Option<BTreeMap<String, f32>>,
    ) -> Self {
        Self { classifier, vectorizer, sample }
    }

    /// Load every artifact named in `config`. Failures degrade, they never abort.
    pub fn load(config: &Config) -> Self {
        let classifier = match PhishClassifier::load(&config.model_path) {
            Ok(classifier) => {
                tracing::info!(
                    model_id = %classifier.metadata().model_id,
                    n_trees = classifier.metadata().n_trees,
                    "Classifier ready"
                );
                ClassifierState::Ready(classifier)
            }
            Err(e) => {
                tracing::error!("Classifier load failed: {}", e);
                ClassifierState::Degraded { reason: e.to_string() }
            }
        };

        let vectorizer = match TfidfVectorizer::load(&config.vectorizer_path) {
            Ok((header, vectorizer)) => match &classifier {
                ClassifierState::Ready(ready) if ready.metadata().model_id != header.model_id => {
                    tracing::error!(
                        "Vectorizer {} was not trained with classifier {}, URL predictions disabled",
                        header.model_id,
                        ready.metadata().model_id
                    );
                    None
                }
                _ => {
                    tracing::info!("Vectorizer ready: {} n-grams", vectorizer.width());
                    Some(vectorizer)
                }
            },
            Err(e) => {
                tracing::warn!("Vectorizer unavailable, URL predictions disabled: {}", e);
                None
            }
        };

        Self {
            classifier,
            vectorizer,
            sample: load_sample(&config.sample_dataset_path),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.classifier, ClassifierState::Ready(_))
    }

    pub fn classifier(&self) -> AppResult<&PhishClassifier> {
        match &self.classifier {
            ClassifierState::Ready(classifier) => Ok(classifier),
            ClassifierState::Degraded { .. } => Err(AppError::ModelUnavailable),
        }
    }

    pub fn vectorizer(&self) -> AppResult<&TfidfVectorizer> {
        self.vectorizer.as_ref().ok_or(AppError::VectorizerUnavailable)
    }

    pub fn has_vectorizer(&self) -> bool {
        self.vectorizer.is_some()
    }

    pub fn sample(&self) -> Option<&BTreeMap<String, f32>> {
        self.sample.as_ref()
    }
}

fn load_sample(path: &Path) -> Option<BTreeMap<String, f32>> {
    match read_sample(path) {
        Ok(Some(sample)) => {
            tracing::info!("Sample row loaded from {}", path.display());
            Some(sample)
        }
        Ok(None) => {
            tracing::warn!("Sample dataset {} has no rows", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("Sample dataset unavailable: {}", e);
            None
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
    pub config: Config,
}
