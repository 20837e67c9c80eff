//! Random Forest - bagged Gini trees with balanced class weights
//!
//! Per-tree seeds are drawn up front from the master seed so the fitted
//! forest is identical no matter how rayon schedules the trees.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeParams};
use super::{Classifier, Label, N_CLASSES};
use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_N_TREES, DEFAULT_SEED};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Reweight classes by `n / (n_classes * count)`
    pub balanced: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_N_TREES,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            balanced: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestParams {
    /// At least one tree, and splits need two samples
    pub fn validate(&self) -> CoreResult<()> {
        if self.n_trees == 0 {
            return Err(CoreError::InvalidParams("n_trees must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(CoreError::InvalidParams(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

/// Balanced class weights: `n / (n_classes * count_c)`, 0 for absent classes
pub fn balanced_class_weights(y: &[usize]) -> [f64; N_CLASSES] {
    let mut counts = [0usize; N_CLASSES];
    for &label in y {
        counts[label] += 1;
    }
    let n = y.len() as f64;
    counts.map(|c| if c == 0 { 0.0 } else { n / (N_CLASSES as f64 * c as f64) })
}

impl RandomForest {
    pub fn fit(x: ArrayView2<'_, f32>, labels: &[Label], params: ForestParams) -> CoreResult<Self> {
        params.validate()?;
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(CoreError::EmptyDataset);
        }
        if labels.len() != n_samples {
            return Err(CoreError::ShapeMismatch {
                expected: n_samples,
                actual: labels.len(),
            });
        }

        let y: Vec<usize> = labels.iter().map(|l| l.index()).collect();
        let class_weights = if params.balanced {
            balanced_class_weights(&y)
        } else {
            [1.0; N_CLASSES]
        };
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        };

        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_trees).map(|_| master.gen()).collect();

        let trees: Vec<DecisionTree> = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut weights = vec![0.0f64; n_samples];
                for _ in 0..n_samples {
                    weights[rng.gen_range(0..n_samples)] += 1.0;
                }
                for (w, &label) in weights.iter_mut().zip(&y) {
                    *w *= class_weights[label];
                }
                DecisionTree::fit(x, &y, &weights, tree_params, &mut rng)
            })
            .collect();

        log::info!(
            "Random forest fitted: {} trees, {} samples, {} features (class weights {:?})",
            trees.len(),
            n_samples,
            n_features,
            class_weights
        );

        Ok(Self {
            params,
            n_features,
            trees,
        })
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn check_width(&self, sample: &[f32]) -> CoreResult<()> {
        if sample.len() != self.n_features {
            return Err(CoreError::ShapeMismatch {
                expected: self.n_features,
                actual: sample.len(),
            });
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean of the per-tree leaf distributions
    fn predict_proba(&self, sample: &[f32]) -> CoreResult<[f64; N_CLASSES]> {
        self.check_width(sample)?;
        if self.trees.is_empty() {
            return Err(CoreError::NotFitted);
        }

        let mut proba = [0.0; N_CLASSES];
        for tree in &self.trees {
            let dist = tree.predict_proba(sample);
            for c in 0..N_CLASSES {
                proba[c] += dist[c];
            }
        }
        let n = self.trees.len() as f64;
        Ok(proba.map(|p| p / n))
    }
}
