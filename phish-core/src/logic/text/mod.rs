//! Text Module - Character n-gram TF-IDF over raw URLs

pub mod tfidf;

pub use tfidf::{TfidfParams, TfidfVectorizer};
