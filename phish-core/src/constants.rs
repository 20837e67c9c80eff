//! Central Configuration Constants
//!
//! Single source of truth for training and artifact defaults.

/// App name
pub const APP_NAME: &str = "PhishGuard";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Artifact locations
// ============================================

/// Default classifier artifact path (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "models/phish_model.bin";

/// Default vectorizer artifact path
pub const DEFAULT_VECTORIZER_PATH: &str = "models/phish_vectorizer.bin";

/// Default export of the combined training dataset
pub const DEFAULT_DATASET_PATH: &str = "data/combined_urls.csv";

/// Default labeled inputs
pub const DEFAULT_PHISHING_PATH: &str = "phishing_urls.csv";
pub const DEFAULT_LEGITIMATE_PATH: &str = "legitimate_urls.csv";

// ============================================
// Training defaults
// ============================================

pub const DEFAULT_N_TREES: usize = 100;
pub const DEFAULT_MAX_DEPTH: usize = 15;
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 5;
pub const DEFAULT_SEED: u64 = 42;

/// Vectorizer vocabulary cap when used standalone
pub const DEFAULT_TFIDF_MAX_FEATURES: usize = 500;

/// Hosts treated as URL shorteners (substring match on the netloc)
pub const SHORTENER_DOMAINS: &[&str] = &["bit.ly", "goo.gl", "tinyurl"];
