//! Prediction request/response model

use std::collections::BTreeMap;

use phish_core::logic::model::{Label, Prediction};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// `feature_0`..`feature_46`; keys outside the layout are ignored
    pub features: Option<Map<String, Value>>,
    #[serde(default)]
    pub include_probabilities: bool,
}

#[derive(Debug, Deserialize)]
pub struct UrlPredictRequest {
    pub url: String,
    #[serde(default)]
    pub include_probabilities: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// 0 = legitimate, 1 = phishing
    pub prediction: usize,
    pub label: Label,
    pub confidence: f64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
    /// Assembled vector, returned for URL predictions only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, f32>>,
}

#[derive(Debug, Serialize)]
pub struct ClassProbabilities {
    pub legitimate: f64,
    pub phishing: f64,
}

impl PredictResponse {
    pub fn new(prediction: &Prediction, include_probabilities: bool) -> Self {
        let probabilities = include_probabilities.then(|| ClassProbabilities {
            legitimate: prediction.probabilities[Label::Legitimate.index()],
            phishing: prediction.probabilities[Label::Phishing.index()],
        });
        Self {
            prediction: prediction.label.index(),
            label: prediction.label,
            confidence: prediction.confidence,
            status: "success",
            probabilities,
            features: None,
        }
    }

    pub fn with_features(mut self, features: BTreeMap<String, f32>) -> Self {
        self.features = Some(features);
        self
    }
}
