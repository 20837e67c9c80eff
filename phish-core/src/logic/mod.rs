//! Logic Module - Extraction, vectorizer, classifier and training
//!
//! ## Layout
//! - `features/` - URL split, structural fields, canonical 47-slot vector
//! - `text/` - character n-gram TF-IDF
//! - `model/` - random forest, artifacts, inference
//! - `dataset/` - labeled CSV input and combined export
//! - `training/` - offline pipeline tying the above together

pub mod dataset;
pub mod features;
pub mod model;
pub mod text;
pub mod training;
