//! Training Pipeline

use std::path::PathBuf;
use std::time::Instant;

use ndarray::{concatenate, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::TrainingConfig;
use crate::logic::dataset::{load_labeled, CombinedWriter, DatasetRecord, LabeledUrl};
use crate::logic::features::{
    extract, FeatureVector, FEATURE_COUNT, STRUCTURAL_COUNT, TEXT_FEATURE_COUNT,
};
use crate::logic::model::{Label, PhishClassifier, RandomForest};
use crate::logic::text::TfidfVectorizer;
use crate::{CoreError, CoreResult};

/// Everything produced by one fit, before anything touches disk
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub model_id: Uuid,
    pub classifier: PhishClassifier,
    pub vectorizer: TfidfVectorizer,
    /// Training rows in sample order
    pub vectors: Vec<FeatureVector>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub model_id: Uuid,
    pub samples: usize,
    pub phishing: usize,
    pub legitimate: usize,
    pub vocabulary_size: usize,
    pub n_trees: usize,
    /// Accuracy on the training rows themselves
    pub training_accuracy: f64,
    pub duration_ms: u64,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub dataset_path: PathBuf,
}

/// Structural columns (0-14) next to the TF-IDF columns (15-46).
/// A vocabulary smaller than the text slots leaves the trailing columns at zero.
pub fn build_matrix(samples: &[LabeledUrl], vectorizer: &TfidfVectorizer) -> CoreResult<Array2<f32>> {
    let urls: Vec<&str> = samples.iter().map(|s| s.url.as_str()).collect();

    let structural_rows: Vec<f32> = urls
        .par_iter()
        .flat_map_iter(|url| extract(url).to_array())
        .collect();
    let structural = Array2::from_shape_vec((urls.len(), STRUCTURAL_COUNT), structural_rows)
        .map_err(|e| CoreError::InvalidArtifact(format!("structural matrix: {}", e)))?;

    let text = vectorizer.transform(&urls)?;
    if text.ncols() > TEXT_FEATURE_COUNT {
        return Err(CoreError::ShapeMismatch {
            expected: TEXT_FEATURE_COUNT,
            actual: text.ncols(),
        });
    }
    let padding = Array2::<f32>::zeros((urls.len(), TEXT_FEATURE_COUNT - text.ncols()));

    let combined = concatenate![Axis(1), structural, text, padding];
    debug_assert_eq!(combined.ncols(), FEATURE_COUNT);
    Ok(combined)
}

fn rows_to_vectors(matrix: &Array2<f32>) -> Vec<FeatureVector> {
    matrix
        .rows()
        .into_iter()
        .map(|row| {
            let mut values = [0.0f32; FEATURE_COUNT];
            for (slot, value) in values.iter_mut().zip(row.iter()) {
                *slot = *value;
            }
            FeatureVector::from_values(values)
        })
        .collect()
}

/// Fit vectorizer and forest in memory
pub fn fit_models(samples: &[LabeledUrl], config: &TrainingConfig) -> CoreResult<TrainedModels> {
    if samples.is_empty() {
        return Err(CoreError::EmptyDataset);
    }
    config.forest.validate()?;

    let urls: Vec<&str> = samples.iter().map(|s| s.url.as_str()).collect();
    let mut vectorizer = TfidfVectorizer::new(config.text.clone());
    vectorizer.fit(&urls)?;
    log::info!("Vectorizer fitted: {} n-grams", vectorizer.width());

    let matrix = build_matrix(samples, &vectorizer)?;
    let labels: Vec<Label> = samples.iter().map(|s| s.label).collect();

    let forest = RandomForest::fit(matrix.view(), &labels, config.forest)?;
    let model_id = Uuid::new_v4();
    let classifier = PhishClassifier::from_forest(forest, model_id)?;

    Ok(TrainedModels {
        model_id,
        classifier,
        vectorizer,
        vectors: rows_to_vectors(&matrix),
    })
}

/// Full offline run: load, fit, save both artifacts, export the combined dataset
pub fn train(config: &TrainingConfig) -> CoreResult<TrainingReport> {
    let start_time = Instant::now();
    log::info!(
        "Training from {} and {}",
        config.phishing_path.display(),
        config.legitimate_path.display()
    );

    let samples = load_labeled(&config.phishing_path, &config.legitimate_path)?;
    let phishing = samples.iter().filter(|s| s.label == Label::Phishing).count();
    let legitimate = samples.len() - phishing;

    let trained = fit_models(&samples, config)?;

    trained.classifier.save(&config.model_path)?;
    trained.vectorizer.save(&config.vectorizer_path, trained.model_id)?;

    let mut writer = CombinedWriter::create(&config.dataset_path)?;
    for (sample, vector) in samples.iter().zip(&trained.vectors) {
        writer.append(&DatasetRecord::new(sample, vector))?;
    }
    writer.finish()?;

    let mut correct = 0usize;
    for (sample, vector) in samples.iter().zip(&trained.vectors) {
        if trained.classifier.predict(vector)?.label == sample.label {
            correct += 1;
        }
    }

    let report = TrainingReport {
        model_id: trained.model_id,
        samples: samples.len(),
        phishing,
        legitimate,
        vocabulary_size: trained.vectorizer.width(),
        n_trees: trained.classifier.metadata().n_trees,
        training_accuracy: correct as f64 / samples.len() as f64,
        duration_ms: start_time.elapsed().as_millis() as u64,
        model_path: config.model_path.clone(),
        vectorizer_path: config.vectorizer_path.clone(),
        dataset_path: config.dataset_path.clone(),
    };

    log::info!(
        "Training complete: {} samples ({} phishing / {} legitimate), accuracy {:.4}, {} ms",
        report.samples,
        report.phishing,
        report.legitimate,
        report.training_accuracy,
        report.duration_ms
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::read_sample;
    use crate::logic::features::FeatureSlot;
    use crate::logic::model::ForestParams;
    use std::fs;
    use tempfile::tempdir;

    const PHISHING: &[&str] = &[
        "http://192.168.10.4/paypal/login.exe",
        "http://secure-login.bank-verify.com/account@update",
        "http://bit.ly/2xYz9Qw",
        "http://paypal.com.verify-user.info//redirect?next=http://evil.ru",
        "http://10.0.0.7:8080/apple-id/confirm.php?id=9981&token=x1",
        "http://tinyurl.com/free-gift-card",
        "http://login-microsoftonline.support-ticket.xyz/owa/",
        "http://update-billing.netflix-account.co/verify?u=123&p=456",
    ];

    const LEGITIMATE: &[&str] = &[
        "https://www.rust-lang.org/learn",
        "https://github.com/tokio-rs/axum",
        "https://docs.python.org/3/library/urllib.parse.html",
        "https://en.wikipedia.org/wiki/Phishing",
        "https://www.example.com/",
        "https://news.ycombinator.com/",
        "https://crates.io/crates/serde",
        "https://developer.mozilla.org/en-US/docs/Web/HTTP",
    ];

    fn samples() -> Vec<LabeledUrl> {
        PHISHING
            .iter()
            .map(|u| LabeledUrl { url: u.to_string(), label: Label::Phishing })
            .chain(LEGITIMATE.iter().map(|u| LabeledUrl { url: u.to_string(), label: Label::Legitimate }))
            .collect()
    }

    fn config() -> TrainingConfig {
        TrainingConfig {
            forest: ForestParams { n_trees: 20, ..ForestParams::default() },
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_matrix_layout() {
        let samples = samples();
        let mut vectorizer = TfidfVectorizer::new(config().text);
        let urls: Vec<&str> = samples.iter().map(|s| s.url.as_str()).collect();
        vectorizer.fit(&urls).unwrap();

        let matrix = build_matrix(&samples, &vectorizer).unwrap();
        assert_eq!(matrix.dim(), (samples.len(), FEATURE_COUNT));
        assert_eq!(matrix[[0, FeatureSlot::HasIp.index()]], 1.0);
        assert_eq!(matrix[[0, FeatureSlot::PathHasExe.index()]], 1.0);
        assert_eq!(matrix[[8, FeatureSlot::HasHttps.index()]], 1.0);
    }

    #[test]
    fn test_oversized_vocabulary_rejected() {
        let samples = samples();
        let mut vectorizer = TfidfVectorizer::new(crate::logic::text::TfidfParams::default());
        let urls: Vec<&str> = samples.iter().map(|s| s.url.as_str()).collect();
        vectorizer.fit(&urls).unwrap();
        assert!(vectorizer.width() > TEXT_FEATURE_COUNT);

        assert!(matches!(
            build_matrix(&samples, &vectorizer),
            Err(CoreError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_training_is_deterministic() {
        let samples = samples();
        let a = fit_models(&samples, &config()).unwrap();
        let b = fit_models(&samples, &config()).unwrap();
        assert_ne!(a.model_id, b.model_id);

        let mut fixed = FeatureVector::new();
        fixed.set(FeatureSlot::Length, 40.0);
        fixed.set(FeatureSlot::HasIp, 1.0);
        fixed.set(FeatureSlot::Text05, 0.3);

        assert_eq!(a.classifier.forest(), b.classifier.forest());
        let pa = a.classifier.predict(&fixed).unwrap();
        let pb = b.classifier.predict(&fixed).unwrap();
        assert_eq!(pa.label, pb.label);
        assert_eq!(pa.probabilities, pb.probabilities);
        assert_eq!(a.vectors, b.vectors);
    }

    #[test]
    fn test_train_writes_artifacts_and_export() {
        let dir = tempdir().unwrap();
        let phishing = dir.path().join("phishing_urls.csv");
        let legitimate = dir.path().join("legitimate_urls.csv");
        fs::write(&phishing, format!("url\n{}\n", PHISHING.join("\n"))).unwrap();
        fs::write(&legitimate, format!("url\n{}\n", LEGITIMATE.join("\n"))).unwrap();

        let config = TrainingConfig {
            phishing_path: phishing,
            legitimate_path: legitimate,
            model_path: dir.path().join("models/phish_model.bin"),
            vectorizer_path: dir.path().join("models/phish_vectorizer.bin"),
            dataset_path: dir.path().join("data/combined_urls.csv"),
            ..config()
        };

        let report = train(&config).unwrap();
        assert_eq!(report.samples, 16);
        assert_eq!(report.phishing, 8);
        assert_eq!(report.n_trees, 20);
        assert!(report.vocabulary_size <= TEXT_FEATURE_COUNT);
        assert!(report.training_accuracy > 0.5);

        let classifier = PhishClassifier::load(&config.model_path).unwrap();
        assert_eq!(classifier.metadata().model_id, report.model_id);
        let (header, vectorizer) = TfidfVectorizer::load(&config.vectorizer_path).unwrap();
        assert_eq!(header.model_id, report.model_id);
        assert_eq!(vectorizer.width(), report.vocabulary_size);

        let sample = read_sample(&config.dataset_path).unwrap().unwrap();
        assert_eq!(sample["feature_4"], 1.0);
    }

    #[test]
    fn test_zero_trees_aborts_before_writing() {
        let dir = tempdir().unwrap();
        let phishing = dir.path().join("phishing_urls.csv");
        let legitimate = dir.path().join("legitimate_urls.csv");
        fs::write(&phishing, format!("url\n{}\n", PHISHING.join("\n"))).unwrap();
        fs::write(&legitimate, format!("url\n{}\n", LEGITIMATE.join("\n"))).unwrap();

        let config = TrainingConfig {
            phishing_path: phishing,
            legitimate_path: legitimate,
            model_path: dir.path().join("phish_model.bin"),
            vectorizer_path: dir.path().join("phish_vectorizer.bin"),
            dataset_path: dir.path().join("combined_urls.csv"),
            forest: ForestParams { n_trees: 0, ..ForestParams::default() },
            ..TrainingConfig::default()
        };

        assert!(matches!(fit_models(&samples(), &config), Err(CoreError::InvalidParams(_))));
        assert!(matches!(train(&config), Err(CoreError::InvalidParams(_))));
        assert!(!config.model_path.exists());
        assert!(!config.vectorizer_path.exists());
        assert!(!config.dataset_path.exists());
    }
}
