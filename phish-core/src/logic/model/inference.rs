//! Inference Engine - loaded classifier artifact
//!
//! Wraps a fitted forest with its artifact metadata. Loaded once, then
//! shared read-only; nothing here mutates after construction.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::artifact::{self, ArtifactKind};
use super::{Classifier, Label, RandomForest, N_CLASSES};
use crate::logic::features::layout::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};
use crate::logic::features::FeatureVector;
use crate::{CoreError, CoreResult};

/// Round to 4 decimal digits
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub n_trees: usize,
    pub feature_version: u8,
    pub layout_hash: u32,
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of `label`, rounded to 4 decimals
    pub confidence: f64,
    /// Per-class distribution (legitimate, phishing), rounded to 4 decimals
    pub probabilities: [f64; N_CLASSES],
    pub inference_time_us: u64,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub struct PhishClassifier {
    forest: RandomForest,
    metadata: ModelMetadata,
}

impl PhishClassifier {
    /// Wrap a freshly fitted forest
    pub fn from_forest(forest: RandomForest, model_id: Uuid) -> CoreResult<Self> {
        if forest.n_features() != FEATURE_COUNT {
            return Err(CoreError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: forest.n_features(),
            });
        }
        let metadata = ModelMetadata {
            model_id,
            created_at: Utc::now(),
            n_trees: forest.n_trees(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
        };
        Ok(Self { forest, metadata })
    }

    /// Load classifier artifact from file
    pub fn load(path: &Path) -> CoreResult<Self> {
        log::info!("Loading classifier from: {}", path.display());

        let (header, forest): (_, RandomForest) = artifact::load(path, ArtifactKind::Classifier)?;
        let mut classifier = Self::from_forest(forest, header.model_id)?;
        classifier.metadata.created_at = header.created_at;

        log::info!(
            "Classifier loaded: {} trees, layout v{} ({:08x})",
            classifier.metadata.n_trees,
            header.feature_version,
            header.layout_hash
        );
        Ok(classifier)
    }

    pub fn save(&self, path: &Path) -> CoreResult<()> {
        artifact::save(path, ArtifactKind::Classifier, self.metadata.model_id, &self.forest)?;
        Ok(())
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Classify one vector
    pub fn predict(&self, vector: &FeatureVector) -> CoreResult<Prediction> {
        let start_time = Instant::now();
        vector.validate()?;

        let sample = vector.as_slice();
        let label = self.forest.predict(sample)?;
        let probabilities = self.forest.predict_proba(sample)?.map(round4);

        Ok(Prediction {
            label,
            confidence: probabilities[label.index()],
            probabilities,
            inference_time_us: start_time.elapsed().as_micros() as u64,
        })
    }
}
