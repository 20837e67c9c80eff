//! Decision Tree - weighted Gini CART for two classes
//!
//! Grown on bootstrap weights handed in by the forest. Each split looks at a
//! random subset of features; features that are constant inside the node do
//! not count toward that subset.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::N_CLASSES;

/// Values closer than this are treated as equal when looking for split points
const FEATURE_THRESHOLD: f32 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features examined per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: [f64; N_CLASSES],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f32,
    /// Weighted child impurity, lower is better
    score: f64,
}

struct Grower<'a> {
    x: ArrayView2<'a, f32>,
    y: &'a [usize],
    weights: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
}

fn gini(counts: &[f64; N_CLASSES]) -> f64 {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

impl DecisionTree {
    /// Grow a tree over the rows with positive weight
    pub fn fit(
        x: ArrayView2<'_, f32>,
        y: &[usize],
        weights: &[f64],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut indices: Vec<usize> = (0..x.nrows()).filter(|&i| weights[i] > 0.0).collect();
        let mut grower = Grower {
            x: x.reborrow(),
            y,
            weights,
            params,
            nodes: Vec::new(),
        };
        grower.grow(&mut indices, 0, rng);
        Self { nodes: grower.nodes }
    }

    /// Class distribution of the leaf reached by `sample`
    pub fn predict_proba(&self, sample: &[f32]) -> [f64; N_CLASSES] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return *distribution,
                Node::Split { feature, threshold, left, right } => {
                    index = if sample[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

impl<'a> Grower<'a> {
    fn class_counts(&self, indices: &[usize]) -> [f64; N_CLASSES] {
        let mut counts = [0.0; N_CLASSES];
        for &i in indices {
            counts[self.y[i]] += self.weights[i];
        }
        counts
    }

    fn leaf(&mut self, counts: [f64; N_CLASSES]) -> usize {
        let total: f64 = counts.iter().sum();
        let distribution = if total > 0.0 {
            counts.map(|c| c / total)
        } else {
            [1.0 / N_CLASSES as f64; N_CLASSES]
        };
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn grow(&mut self, indices: &mut [usize], depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(indices);

        if depth >= self.params.max_depth
            || indices.len() < self.params.min_samples_split
            || gini(&counts) <= 0.0
        {
            return self.leaf(counts);
        }

        let best = match self.best_split(indices, rng) {
            Some(best) => best,
            None => return self.leaf(counts),
        };

        // Reserve this node's slot before the children are pushed
        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution: [0.0; N_CLASSES] });

        let mid = partition(indices, |i| self.x[[i, best.feature]] <= best.threshold);
        let (left_rows, right_rows) = indices.split_at_mut(mid);
        let left = self.grow(left_rows, depth + 1, rng);
        let right = self.grow(right_rows, depth + 1, rng);

        self.nodes[node] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node
    }

    fn best_split(&self, indices: &[usize], rng: &mut StdRng) -> Option<BestSplit> {
        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(rng);

        let total = self.class_counts(indices);
        let mut best: Option<BestSplit> = None;
        let mut visited = 0;
        let mut sorted: Vec<(f32, usize)> = Vec::with_capacity(indices.len());

        for feature in features {
            if visited >= self.params.max_features {
                break;
            }

            sorted.clear();
            sorted.extend(indices.iter().map(|&i| (self.x[[i, feature]], i)));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (first, last) = (sorted[0].0, sorted[sorted.len() - 1].0);
            if last <= first + FEATURE_THRESHOLD {
                continue;
            }
            visited += 1;

            let mut left = [0.0; N_CLASSES];
            for k in 0..sorted.len() - 1 {
                let (value, row) = sorted[k];
                left[self.y[row]] += self.weights[row];

                let next = sorted[k + 1].0;
                if next <= value + FEATURE_THRESHOLD {
                    continue;
                }

                let mut right = total;
                for c in 0..N_CLASSES {
                    right[c] -= left[c];
                }
                let wl: f64 = left.iter().sum();
                let wr: f64 = right.iter().sum();
                let score = wl * gini(&left) + wr * gini(&right);

                if best.as_ref().map_or(true, |b| score < b.score) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(BestSplit { feature, threshold, score });
                }
            }
        }

        best
    }
}

/// Move rows matching `pred` to the front, returning how many matched
fn partition(indices: &mut [usize], pred: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for k in 0..indices.len() {
        if pred(indices[k]) {
            indices.swap(mid, k);
            mid += 1;
        }
    }
    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams { max_depth: 10, min_samples_split: 2, max_features: 2 }
    }

    #[test]
    fn test_separable_split() {
        let x = array![[0.0f32, 5.0], [1.0, 5.0], [10.0, 5.0], [11.0, 5.0]];
        let y = [0, 0, 1, 1];
        let w = [1.0; 4];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(x.view(), &y, &w, params(), &mut rng);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_proba(&[0.5, 5.0]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[10.5, 5.0]), [0.0, 1.0]);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let x = array![[1.0f32], [2.0], [3.0]];
        let y = [1, 1, 1];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(x.view(), &y, &[1.0; 3], params(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[2.0]), [0.0, 1.0]);
    }

    #[test]
    fn test_min_samples_split_stops_growth() {
        let x = array![[0.0f32], [1.0], [2.0], [3.0]];
        let y = [0, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let p = TreeParams { min_samples_split: 5, ..params() };

        let tree = DecisionTree::fit(x.view(), &y, &[1.0; 4], p, &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[0.0]), [0.5, 0.5]);
    }

    #[test]
    fn test_weights_shift_leaf_distribution() {
        let x = array![[0.0f32], [0.0], [0.0]];
        let y = [0, 1, 1];
        let w = [2.0, 1.0, 1.0];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(x.view(), &y, &w, params(), &mut rng);
        assert_eq!(tree.predict_proba(&[0.0]), [0.5, 0.5]);
    }

    #[test]
    fn test_zero_weight_rows_are_ignored() {
        let x = array![[0.0f32], [1.0], [2.0]];
        let y = [0, 1, 1];
        let w = [1.0, 0.0, 1.0];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(x.view(), &y, &w, params(), &mut rng);
        assert_eq!(tree.predict_proba(&[1.0]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[1.6]), [0.0, 1.0]);
    }

    #[test]
    fn test_max_depth_respected() {
        let x = array![[0.0f32], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0]];
        let y = [0, 1, 0, 1, 0, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let p = TreeParams { max_depth: 2, ..params() };

        let tree = DecisionTree::fit(x.view(), &y, &[1.0; 8], p, &mut rng);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_fit_with_per_tree_weights() {
        let x = array![[0.0f32, 1.0], [1.0, 1.0], [2.0, 0.0], [3.0, 0.0]];
        let view = x.view();
        let mut rng = StdRng::seed_from_u64(3);

        let trees: Vec<DecisionTree> = (0..3)
            .map(|k| {
                let y = vec![0, 0, 1, 1];
                let weights: Vec<f64> = (0..4).map(|i| if i == k { 2.0 } else { 1.0 }).collect();
                DecisionTree::fit(view, &y, &weights, params(), &mut rng)
            })
            .collect();

        for tree in &trees {
            assert_eq!(tree.predict_proba(&[0.0, 1.0]), [1.0, 0.0]);
            assert_eq!(tree.predict_proba(&[3.0, 0.0]), [0.0, 1.0]);
        }
    }
}
