//! Model Module - Random forest classifier and its artifacts
//!
//! Training lives in `forest`/`tree`; the serving side only touches
//! `inference`, which wraps a loaded artifact.

pub mod artifact;
pub mod forest;
pub mod inference;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::CoreResult;

// Re-export common types
pub use artifact::{ArtifactHeader, ArtifactKind};
pub use forest::{ForestParams, RandomForest};
pub use inference::{PhishClassifier, Prediction};

/// Binary task: legitimate vs phishing
pub const N_CLASSES: usize = 2;

/// Class label, index 0 = legitimate, 1 = phishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Legitimate,
    Phishing,
}

impl Label {
    pub fn index(self) -> usize {
        match self {
            Label::Legitimate => 0,
            Label::Phishing => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Legitimate),
            1 => Some(Label::Phishing),
            _ => None,
        }
    }

    /// Dataset `type` column value
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Legitimate => "legitimate",
            Label::Phishing => "phishing",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that scores a fixed-width sample
pub trait Classifier {
    fn n_features(&self) -> usize;

    /// Per-class probabilities, summing to 1
    fn predict_proba(&self, sample: &[f32]) -> CoreResult<[f64; N_CLASSES]>;

    /// Most probable class; ties go to the lower index
    fn predict(&self, sample: &[f32]) -> CoreResult<Label> {
        let proba = self.predict_proba(sample)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(Label::from_index(best).unwrap_or(Label::Legitimate))
    }
}
