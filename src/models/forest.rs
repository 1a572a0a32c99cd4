//! Random forest regression

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModelError;

enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

struct RegressionTree {
    root: TreeNode,
}

impl RegressionTree {
    fn predict_row(&self, sample: &ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] < *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// Ensemble of regression trees fitted on bootstrap samples.
///
/// Each tree splits on randomly sampled thresholds over a random feature
/// subset; predictions are the mean of the per-tree predictions.
pub struct RandomForestRegressor {
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    seed: Option<u64>,
    trees: Vec<RegressionTree>,
    n_features: Option<usize>,
}

/// Random threshold candidates tried per feature when searching a split.
const THRESHOLD_CANDIDATES: usize = 10;

impl RandomForestRegressor {
    pub fn new(n_trees: usize, max_depth: usize, min_samples_split: usize) -> Self {
        Self {
            // An empty forest cannot predict, so at least one tree.
            n_trees: n_trees.max(1),
            max_depth,
            min_samples_split,
            seed: None,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fits the forest. A repeated call discards the previous trees.
    pub fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if X.nrows() == 0 || X.ncols() == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if X.nrows() != y.len() {
            return Err(ModelError::SampleCountMismatch {
                features: X.nrows(),
                targets: y.len(),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let n_samples = X.nrows();
        let mut trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            // Bootstrap sample: n rows drawn with replacement
            let indices: Vec<usize> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let root = self.grow(X, y, indices, 0, &mut rng);
            trees.push(RegressionTree { root });
        }

        self.trees = trees;
        self.n_features = Some(X.ncols());
        Ok(())
    }

    fn grow(
        &self,
        X: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        if depth >= self.max_depth || indices.len() < self.min_samples_split {
            return TreeNode::Leaf {
                value: Self::mean(y, &indices),
            };
        }

        // sqrt-feature subsampling
        let n_candidates = ((X.ncols() as f64).sqrt().round() as usize)
            .max(1)
            .min(X.ncols());
        let features = rand::seq::index::sample(rng, X.ncols(), n_candidates);

        let mut best_feature = 0;
        let mut best_threshold = 0.0;
        let mut best_score = f64::INFINITY;

        for feature in features.iter() {
            let mut min_val = f64::INFINITY;
            let mut max_val = f64::NEG_INFINITY;
            for &i in &indices {
                let val = X[[i, feature]];
                min_val = min_val.min(val);
                max_val = max_val.max(val);
            }
            if (max_val - min_val).abs() < 1e-10 {
                continue;
            }

            for _ in 0..THRESHOLD_CANDIDATES {
                let threshold = rng.gen_range(min_val..=max_val);
                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| X[[i, feature]] < threshold);
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let score = Self::sse(y, &left) + Self::sse(y, &right);
                if score < best_score {
                    best_score = score;
                    best_feature = feature;
                    best_threshold = threshold;
                }
            }
        }

        if best_score == f64::INFINITY {
            // No usable split, all candidate features are constant
            return TreeNode::Leaf {
                value: Self::mean(y, &indices),
            };
        }

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| X[[i, best_feature]] < best_threshold);

        TreeNode::Split {
            feature: best_feature,
            threshold: best_threshold,
            left: Box::new(self.grow(X, y, left_indices, depth + 1, rng)),
            right: Box::new(self.grow(X, y, right_indices, depth + 1, rng)),
        }
    }

    fn mean(y: &Array1<f64>, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
    }

    fn sse(y: &Array1<f64>, indices: &[usize]) -> f64 {
        let mean = Self::mean(y, indices);
        indices.iter().map(|&i| (y[i] - mean).powi(2)).sum()
    }

    /// Predicts one value per input row as the mean over all trees.
    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let n_features = self.n_features.ok_or(ModelError::NotTrained)?;
        if X.ncols() != n_features {
            return Err(ModelError::FeatureCountMismatch {
                expected: n_features,
                found: X.ncols(),
            });
        }

        let mut predictions = Array1::zeros(X.nrows());
        for (i, row) in X.rows().into_iter().enumerate() {
            let sum: f64 = self.trees.iter().map(|t| t.predict_row(&row)).sum();
            predictions[i] = sum / self.trees.len() as f64;
        }

        Ok(predictions)
    }
}
