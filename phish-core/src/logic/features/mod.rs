//! Features Module - Feature Extraction Engine
//!
//! URL → structural fields, plus the canonical slot layout that training
//! and serving share.

pub mod entropy;
pub mod layout;
pub mod split;
pub mod url;
pub mod validate;
pub mod vector;


// Re-export common types
pub use layout::{FeatureSlot, FEATURE_COUNT, STRUCTURAL_COUNT, TEXT_FEATURE_COUNT};
pub use url::UrlFeatures;
pub use validate::{assemble, SlotErrors};
pub use vector::{FeatureExtractor, FeatureVector, FeatureVectorBuilder, TextFeatures};

/// Extract the structural record for a URL. Never fails.
pub fn extract(url: &str) -> UrlFeatures {
    UrlFeatures::from_url(url)
}
