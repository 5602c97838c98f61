//! CART regression tree with squared-error splits.
//!
//! Nodes are stored flat; children are indices into `nodes`. Node 0 is the root.

use rand::Rng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Random subset of features considered at each split; `None` = all.
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Node {
    Leaf { value: f64 },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    n_features: usize,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

struct TreeBuilder<'a, R: Rng + ?Sized> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    params: &'a TreeParams,
    rng: &'a mut R,
    n_features: usize,
    nodes: Vec<Node>,
}

impl<R: Rng + ?Sized> TreeBuilder<'_, R> {
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: sum / n as f64 });

        let min_leaf = self.params.min_samples_leaf.max(1);
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || n < self.params.min_samples_split.max(2) || n < 2 * min_leaf {
            return node_id;
        }

        let Some(split) = self.best_split(indices, sum, min_leaf) else {
            return node_id;
        };

        let mut mid = 0;
        for k in 0..n {
            if self.x[indices[k]][split.feature] <= split.threshold {
                indices.swap(mid, k);
                mid += 1;
            }
        }
        // midpoint rounding can collapse onto one side
        if mid == 0 || mid == n {
            return node_id;
        }

        let (left_idx, right_idx) = indices.split_at_mut(mid);
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    /// Maximizes `S_l²/n_l + S_r²/n_r`, which minimizes the children's summed SSE.
    fn best_split(&mut self, indices: &[usize], total: f64, min_leaf: usize) -> Option<SplitCandidate> {
        let n = indices.len();
        let parent_score = total * total / n as f64;

        let features: Vec<usize> = match self.params.max_features {
            Some(k) if k > 0 && k < self.n_features => sample(&mut *self.rng, self.n_features, k).into_vec(),
            _ => (0..self.n_features).collect(),
        };

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in features {
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[i][feature], self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for split_at in 1..n {
                left_sum += column[split_at - 1].1;
                if split_at < min_leaf || n - split_at < min_leaf {
                    continue;
                }
                let (lo, hi) = (column[split_at - 1].0, column[split_at].0);
                if lo >= hi {
                    continue;
                }
                let right_sum = total - left_sum;
                let score = left_sum * left_sum / split_at as f64
                    + right_sum * right_sum / (n - split_at) as f64;
                if best.is_none_or(|b| score > b.score) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        score,
                    });
                }
            }
        }

        best.filter(|b| b.score > parent_score + 1e-9 * parent_score.abs().max(1.0))
    }
}

impl RegressionTree {
    /// Fits on the rows of `x` selected by `indices` (duplicates allowed, for bootstrapping).
    pub fn fit<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map_or(0, |r| r.len());
        if indices.is_empty() {
            return Self { n_features, nodes: vec![Node::Leaf { value: 0.0 }] };
        }

        let mut builder = TreeBuilder {
            x,
            y,
            params,
            rng,
            n_features,
            nodes: Vec::new(),
        };
        let mut idx = indices.to_vec();
        builder.grow(&mut idx, 0);

        Self { n_features, nodes: builder.nodes }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split { feature, threshold, left, right }) => {
                    let v = row.get(*feature).copied().unwrap_or(0.0);
                    id = if v <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }
}
