//! Sample-weighted binary decision tree
//!
//! The building block of the forest: a CART-style tree over a dense
//! feature matrix with per-sample weights, so class-balanced fitting
//! falls out of the weight vector rather than resampling.

use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features sampled per split; None means all.
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        label: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted tree. Importances are unnormalized weighted impurity
/// decreases; the forest averages and normalizes them.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
    importances: Vec<f64>,
    n_features: usize,
}

/// Weighted Gini impurity of a two-class weight pair.
fn gini(w0: f64, w1: f64) -> f64 {
    let total = w0 + w1;
    if total <= 0.0 {
        return 0.0;
    }
    let p0 = w0 / total;
    let p1 = w1 / total;
    1.0 - p0 * p0 - p1 * p1
}

struct Builder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    weights: &'a [f64],
    params: TreeParams,
    importances: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl<'a> Builder<'a> {
    fn node_weights(&self, indices: &[usize]) -> (f64, f64) {
        let mut w0 = 0.0;
        let mut w1 = 0.0;
        for &i in indices {
            if self.y[i] == 1.0 {
                w1 += self.weights[i];
            } else {
                w0 += self.weights[i];
            }
        }
        (w0, w1)
    }

    fn leaf(&self, w0: f64, w1: f64) -> Node {
        // Ties go to the lower class, matching argmax-first behavior.
        Node::Leaf {
            label: if w1 > w0 { 1.0 } else { 0.0 },
        }
    }

    fn build(&mut self, indices: &[usize], depth: usize, rng: &mut ChaCha8Rng) -> Node {
        let (w0, w1) = self.node_weights(indices);

        let pure = w0 == 0.0 || w1 == 0.0;
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if pure || depth_reached || indices.len() < self.params.min_samples_split {
            return self.leaf(w0, w1);
        }

        let Some(split) = self.best_split(indices, w0, w1, rng) else {
            return self.leaf(w0, w1);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.x[[i, split.feature]] <= split.threshold);

        if left_indices.len() < self.params.min_samples_leaf
            || right_indices.len() < self.params.min_samples_leaf
        {
            return self.leaf(w0, w1);
        }

        self.importances[split.feature] += (w0 + w1) * split.gain;

        let left = Box::new(self.build(&left_indices, depth + 1, rng));
        let right = Box::new(self.build(&right_indices, depth + 1, rng));

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        }
    }

    /// Best weighted-Gini split over a random feature subset, found with
    /// a single sorted sweep per feature.
    fn best_split(
        &self,
        indices: &[usize],
        w0: f64,
        w1: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<BestSplit> {
        let n_features = self.x.ncols();
        let candidates: Vec<usize> = match self.params.max_features {
            Some(k) if k < n_features => {
                let all: Vec<usize> = (0..n_features).collect();
                let mut picked: Vec<usize> = all.choose_multiple(rng, k).copied().collect();
                picked.sort_unstable();
                picked
            }
            _ => (0..n_features).collect(),
        };

        let parent_impurity = gini(w0, w1);
        let total_weight = w0 + w1;
        let mut best: Option<BestSplit> = None;

        if indices.len() < 2 {
            return None;
        }

        for feature in candidates {
            let mut rows: Vec<(f64, f64, f64)> = indices
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i], self.weights[i]))
                .collect();
            rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut left_w0 = 0.0;
            let mut left_w1 = 0.0;
            let mut left_count = 0usize;

            for window in 0..rows.len() - 1 {
                let (value, label, weight) = rows[window];
                if label == 1.0 {
                    left_w1 += weight;
                } else {
                    left_w0 += weight;
                }
                left_count += 1;

                let next_value = rows[window + 1].0;
                if next_value <= value {
                    continue; // no boundary between equal values
                }

                let right_count = rows.len() - left_count;
                if left_count < self.params.min_samples_leaf
                    || right_count < self.params.min_samples_leaf
                {
                    continue;
                }

                let right_w0 = w0 - left_w0;
                let right_w1 = w1 - left_w1;
                let left_weight = left_w0 + left_w1;
                let right_weight = right_w0 + right_w1;

                let child_impurity = (left_weight * gini(left_w0, left_w1)
                    + right_weight * gini(right_w0, right_w1))
                    / total_weight;
                let gain = parent_impurity - child_impurity;

                if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (value + next_value) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

impl DecisionTree {
    /// Grow a tree over the given rows. `weights` must align with `y`.
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        weights: &[f64],
        params: TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let n_features = x.ncols();
        let mut builder = Builder {
            x,
            y,
            weights,
            params,
            importances: vec![0.0; n_features],
        };

        let indices: Vec<usize> = (0..x.nrows()).collect();
        let root = builder.build(&indices, 0, rng);

        Self {
            root,
            importances: builder.importances,
            n_features,
        }
    }

    /// Predicted class (0.0 or 1.0) per row.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let mut node = &self.root;
                loop {
                    match node {
                        Node::Leaf { label } => return *label,
                        Node::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            node = if x[[i, *feature]] <= *threshold {
                                left
                            } else {
                                right
                            };
                        }
                    }
                }
            })
            .collect();

        Array1::from_vec(predictions)
    }

    /// Unnormalized weighted impurity decrease per feature.
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn depth(&self) -> usize {
        fn node_depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        node_depth(&self.root)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
