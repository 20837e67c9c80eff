//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent slot ordering between training and serving
//! - Version tracking
//! - Layout hash for compatibility checks

use std::collections::BTreeMap;

use super::layout::{
    validate_layout, layout_hash, FeatureSlot, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_NAMES, FEATURE_VERSION, TEXT_FEATURE_COUNT,
};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
///
/// Every classifier input goes through this type; raw `Vec<f32>` never
/// reaches the model without passing the layout check.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a new zeroed feature vector with current version
    pub fn new() -> Self {
        Self::from_values([0.0; FEATURE_COUNT])
    }

    /// Create from raw values with current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, slot: FeatureSlot) -> f32 {
        self.values[slot.index()]
    }

    pub fn set(&mut self, slot: FeatureSlot, value: f32) {
        self.values[slot.index()] = value;
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Wire-named values (`feature_N` → value)
    pub fn to_named_map(&self) -> BTreeMap<String, f32> {
        FEATURE_NAMES
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f32; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f32; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// FEATURE EXTRACTOR TRAIT
// ============================================================================

/// Trait for feature extractors
pub trait FeatureExtractor {
    /// Extract features and update the vector
    fn extract(&self, vector: &mut FeatureVector);
}

/// Dense TF-IDF row for the text slots.
/// Vocabularies smaller than the slot count leave the tail at zero.
#[derive(Debug, Clone, Default)]
pub struct TextFeatures(pub Vec<f32>);

impl FeatureExtractor for TextFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        for (column, value) in self.0.iter().take(TEXT_FEATURE_COUNT).enumerate() {
            if let Some(slot) = FeatureSlot::text(column) {
                vector.set(slot, *value);
            }
        }
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector from extractors and named slots
pub struct FeatureVectorBuilder {
    vector: FeatureVector,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self { vector: FeatureVector::new() }
    }

    /// Apply an extractor
    pub fn with(mut self, extractor: &impl FeatureExtractor) -> Self {
        extractor.extract(&mut self.vector);
        self
    }

    pub fn set(mut self, slot: FeatureSlot, value: f32) -> Self {
        self.vector.set(slot, value);
        self
    }

    pub fn build(self) -> FeatureVector {
        self.vector
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
