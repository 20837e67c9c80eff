//! PhishGuard Core
//!
//! URL feature extraction, the char n-gram TF-IDF vectorizer, the random
//! forest classifier and the offline training pipeline that ties them
//! together. The prediction service links this crate and only ever reads
//! the artifacts produced here.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{CoreError, CoreResult};
