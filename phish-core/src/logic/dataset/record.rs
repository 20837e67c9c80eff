use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;
use crate::logic::model::Label;

/// One training sample
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LabeledUrl {
    pub url: String,
    pub label: Label,
}

/// One row of the combined export
#[derive(Debug, Clone)]
pub struct DatasetRecord<'a> {
    pub url: &'a str,
    pub label: Label,
    pub features: &'a FeatureVector,
}

impl<'a> DatasetRecord<'a> {
    pub fn new(sample: &'a LabeledUrl, features: &'a FeatureVector) -> Self {
        Self {
            url: &sample.url,
            label: sample.label,
            features,
        }
    }
}
