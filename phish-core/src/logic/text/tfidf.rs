//! TF-IDF Vectorizer - char n-grams
//!
//! Fit once over the training URLs, frozen afterwards. Rows are raw term
//! counts scaled by smoothed IDF (`ln((1 + n) / (1 + df)) + 1`) and
//! L2-normalized. When the vocabulary is capped, the most frequent n-grams
//! across the corpus are kept (ties broken alphabetically) and columns are
//! ordered alphabetically.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_TFIDF_MAX_FEATURES;
use crate::logic::features::{TextFeatures, TEXT_FEATURE_COUNT};
use crate::logic::model::artifact::{self, ArtifactHeader, ArtifactKind};
use crate::{CoreError, CoreResult};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\s+").expect("valid regex"));

// ============================================================================
// PARAMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Smallest n-gram length (inclusive)
    pub ngram_min: usize,
    /// Largest n-gram length (inclusive)
    pub ngram_max: usize,
    /// Vocabulary cap, `None` keeps every n-gram
    pub max_features: Option<usize>,
    pub lowercase: bool,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            ngram_min: 1,
            ngram_max: 3,
            max_features: Some(DEFAULT_TFIDF_MAX_FEATURES),
            lowercase: true,
        }
    }
}

impl TfidfParams {
    /// Cap the vocabulary to the text slots of the feature layout
    pub fn for_layout() -> Self {
        Self {
            max_features: Some(TEXT_FEATURE_COUNT),
            ..Self::default()
        }
    }
}

// ============================================================================
// VECTORIZER
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: TfidfParams,
    /// term → column
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(params: TfidfParams) -> Self {
        Self {
            params,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn params(&self) -> &TfidfParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Number of output columns
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    /// Terms in column order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Char n-grams of a document, after lower-casing and collapsing whitespace runs
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let text = if self.params.lowercase {
            doc.to_lowercase()
        } else {
            doc.to_string()
        };
        let text = WHITESPACE_RUN.replace_all(&text, " ");
        let chars: Vec<char> = text.chars().collect();

        let mut grams = Vec::new();
        for n in self.params.ngram_min.max(1)..=self.params.ngram_max.min(chars.len()) {
            grams.extend(chars.windows(n).map(|w| w.iter().collect::<String>()));
        }
        grams
    }

    fn term_counts(&self, doc: &str) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for gram in self.analyze(doc) {
            *counts.entry(gram).or_insert(0) += 1;
        }
        counts
    }

    /// Learn the vocabulary and IDF weights
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> CoreResult<()> {
        if docs.is_empty() {
            return Err(CoreError::EmptyDataset);
        }

        let mut total: HashMap<String, u64> = HashMap::new();
        let mut df: HashMap<String, u64> = HashMap::new();
        for doc in docs {
            for (term, count) in self.term_counts(doc.as_ref()) {
                *total.entry(term.clone()).or_insert(0) += count as u64;
                *df.entry(term).or_insert(0) += 1;
            }
        }
        if total.is_empty() {
            return Err(CoreError::EmptyVocabulary);
        }

        let mut ranked: Vec<(String, u64)> = total.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(limit) = self.params.max_features {
            ranked.truncate(limit);
        }

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n = docs.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let d = df.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + d)).ln() + 1.0
            })
            .collect();
        self.vocabulary = kept.into_iter().enumerate().map(|(i, t)| (t, i)).collect();

        log::debug!("TF-IDF fitted: {} terms over {} documents", self.width(), docs.len());
        Ok(())
    }

    /// Dense L2-normalized TF-IDF row for one document
    pub fn transform_one(&self, doc: &str) -> CoreResult<Vec<f32>> {
        if !self.is_fitted() {
            return Err(CoreError::NotFitted);
        }

        let mut row = vec![0.0f64; self.width()];
        for (term, count) in self.term_counts(doc) {
            if let Some(&column) = self.vocabulary.get(&term) {
                row[column] = count as f64 * self.idf[column];
            }
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(row.into_iter().map(|v| v as f32).collect())
    }

    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> CoreResult<Array2<f32>> {
        let mut matrix = Array2::<f32>::zeros((docs.len(), self.width()));
        for (i, doc) in docs.iter().enumerate() {
            let row = self.transform_one(doc.as_ref())?;
            for (j, value) in row.into_iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        Ok(matrix)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> CoreResult<Array2<f32>> {
        self.fit(docs)?;
        self.transform(docs)
    }

    /// TF-IDF row shaped for the text slots of the feature vector
    pub fn text_features(&self, doc: &str) -> CoreResult<TextFeatures> {
        Ok(TextFeatures(self.transform_one(doc)?))
    }

    // ========================================================================
    // ARTIFACT I/O
    // ========================================================================

    pub fn save(&self, path: &Path, model_id: Uuid) -> CoreResult<ArtifactHeader> {
        if !self.is_fitted() {
            return Err(CoreError::NotFitted);
        }
        artifact::save(path, ArtifactKind::Vectorizer, model_id, self)
    }

    /// Load a vectorizer artifact and check it fits the text slots
    pub fn load(path: &Path) -> CoreResult<(ArtifactHeader, Self)> {
        let (header, vectorizer): (ArtifactHeader, Self) =
            artifact::load(path, ArtifactKind::Vectorizer)?;
        if vectorizer.width() > TEXT_FEATURE_COUNT {
            return Err(CoreError::ShapeMismatch {
                expected: TEXT_FEATURE_COUNT,
                actual: vectorizer.width(),
            });
        }
        if vectorizer.idf.len() != vectorizer.width() {
            return Err(CoreError::InvalidArtifact(
                "vectorizer idf length does not match vocabulary".to_string(),
            ));
        }
        Ok((header, vectorizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_ngrams() {
        let v = TfidfVectorizer::new(TfidfParams::default());
        let grams = v.analyze("AbC");
        assert_eq!(grams, vec!["a", "b", "c", "ab", "bc", "abc"]);
    }

    #[test]
    fn test_short_doc_skips_long_grams() {
        let v = TfidfVectorizer::new(TfidfParams::default());
        assert_eq!(v.analyze("x"), vec!["x"]);
        assert!(v.analyze("").is_empty());
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let v = TfidfVectorizer::new(TfidfParams { ngram_max: 1, ..TfidfParams::default() });
        assert_eq!(v.analyze("a  \t b"), vec!["a", " ", "b"]);
    }

    #[test]
    fn test_vocabulary_cap_keeps_most_frequent() {
        let mut v = TfidfVectorizer::new(TfidfParams {
            ngram_min: 1,
            ngram_max: 1,
            max_features: Some(2),
            lowercase: true,
        });
        v.fit(&["aaab", "aab", "c"]).unwrap();
        let terms: Vec<&str> = v.terms().collect();
        assert_eq!(terms, vec!["a", "b"]);
    }

    #[test]
    fn test_smooth_idf() {
        let mut v = TfidfVectorizer::new(TfidfParams { ngram_max: 1, ..TfidfParams::default() });
        v.fit(&["ab", "a"]).unwrap();
        // "a" in both docs, "b" in one
        assert!((v.idf()[0] - 1.0).abs() < 1e-12);
        assert!((v.idf()[1] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let mut v = TfidfVectorizer::new(TfidfParams::default());
        let m = v.fit_transform(&["http://a.com", "https://b.org/x"]).unwrap();
        for row in m.rows() {
            let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unknown_terms_give_zero_row() {
        let mut v = TfidfVectorizer::new(TfidfParams::default());
        v.fit(&["aaa"]).unwrap();
        let row = v.transform_one("zzz").unwrap();
        assert!(row.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_unfitted_and_empty() {
        let v = TfidfVectorizer::new(TfidfParams::default());
        assert!(matches!(v.transform_one("a"), Err(CoreError::NotFitted)));

        let mut v = TfidfVectorizer::new(TfidfParams::default());
        assert!(matches!(v.fit::<&str>(&[]), Err(CoreError::EmptyDataset)));
        assert!(matches!(v.fit(&["", ""]), Err(CoreError::EmptyVocabulary)));
    }

    #[test]
    fn test_layout_params_fit_text_slots() {
        let mut v = TfidfVectorizer::new(TfidfParams::for_layout());
        v.fit(&["https://www.example.com/login?session=12345", "http://bit.ly/zz"]).unwrap();
        assert!(v.width() <= TEXT_FEATURE_COUNT);
    }
}
