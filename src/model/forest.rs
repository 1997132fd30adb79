//! Random-forest binary classifier
//!
//! Bagged sample-weighted trees with sqrt feature subsampling and
//! majority voting. Class weights are balanced inversely to label
//! frequency on the training targets, so the minority "bad loan" class
//! is not drowned out. Fitting is deterministic for a given seed: each
//! tree owns a ChaCha8 stream seeded with `seed + tree_index`,
//! independent of thread scheduling.

use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::tree::{DecisionTree, TreeParams};

/// Random forest for a 0/1 target.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
    /// Weight classes inversely to their frequency (n / (2 * n_c)).
    pub balanced: bool,
    feature_importances: Option<Vec<f64>>,
    n_features: usize,
}

impl RandomForestClassifier {
    pub fn new(n_trees: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_trees,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 0,
            balanced: false,
            feature_importances: None,
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_balanced_class_weights(mut self, balanced: bool) -> Self {
        self.balanced = balanced;
        self
    }

    /// Per-sample weights from the balanced class-weight rule.
    fn sample_weights(&self, y: &Array1<f64>) -> Result<Vec<f64>> {
        let n = y.len() as f64;
        let n_pos = y.iter().filter(|&&v| v == 1.0).count() as f64;
        let n_neg = n - n_pos;

        if !self.balanced {
            return Ok(vec![1.0; y.len()]);
        }
        if n_pos == 0.0 || n_neg == 0.0 {
            anyhow::bail!("balanced class weights need both classes present in training data");
        }

        let w_neg = n / (2.0 * n_neg);
        let w_pos = n / (2.0 * n_pos);
        Ok(y.iter()
            .map(|&v| if v == 1.0 { w_pos } else { w_neg })
            .collect())
    }

    /// Fit the forest on a training partition.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            anyhow::bail!(
                "feature matrix has {} rows but target vector has {}",
                n_samples,
                y.len()
            );
        }
        if n_samples == 0 || n_features == 0 {
            anyhow::bail!("cannot fit on an empty training partition");
        }
        if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            anyhow::bail!("target vector contains non-binary value {}", bad);
        }

        self.n_features = n_features;
        let weights = self.sample_weights(y)?;
        let max_features = (n_features as f64).sqrt().ceil() as usize;
        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: Some(max_features.max(1)),
        };

        let base_seed = self.seed;
        let trees: Vec<DecisionTree> = (0..self.n_trees)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));

                // Bootstrap sample with replacement
                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() % n_samples as u64) as usize)
                    .collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot = Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());
                let w_boot: Vec<f64> = sample_indices.iter().map(|&i| weights[i]).collect();

                DecisionTree::fit(&x_boot, &y_boot, &w_boot, params, &mut rng)
            })
            .collect();

        self.trees = trees;
        self.compute_feature_importances();

        Ok(())
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (i, &v) in tree.importances().iter().enumerate() {
                totals[i] += v;
            }
        }

        let n_trees = self.trees.len() as f64;
        for v in &mut totals {
            *v /= n_trees;
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            for v in &mut totals {
                *v /= sum;
            }
        }

        self.feature_importances = Some(totals);
    }

    /// Majority-vote predictions; ties predict class 0.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            anyhow::bail!("forest has not been fitted");
        }
        if x.ncols() != self.n_features {
            anyhow::bail!(
                "expected {} features, got {}",
                self.n_features,
                x.ncols()
            );
        }

        let per_tree: Vec<Array1<f64>> = self.trees.par_iter().map(|t| t.predict(x)).collect();

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let votes_for_one = per_tree.iter().filter(|p| p[i] == 1.0).count();
                if votes_for_one * 2 > self.trees.len() {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Normalized mean split-gain importance per feature.
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    pub fn n_fitted_trees(&self) -> usize {
        self.trees.len()
    }
}
