use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::config::RandomForestConfig;
use super::tree::{RegressionTree, TreeParams};

/// Bagged regression trees; the prediction is the mean over trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn fit(x: &[Vec<f64>], y: &[f64], cfg: &RandomForestConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = TreeParams {
            max_depth: cfg.max_depth,
            min_samples_split: cfg.min_samples_split,
            min_samples_leaf: cfg.min_samples_leaf,
            max_features: cfg.max_features,
        };

        let n = y.len();
        let trees = (0..cfg.n_estimators.max(1))
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, &bootstrap, &params, &mut rng)
            })
            .collect();

        Self { trees }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.trees.first().map_or(0, |t| t.n_features())
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..200).map(|i| vec![i as f64 / 10.0, ((i * 7) % 13) as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| 3.0 * r[0] + 1.0).collect();
        (x, y)
    }

    #[test]
    fn approximates_a_linear_target() {
        let (x, y) = linear_data();
        let cfg = RandomForestConfig { n_estimators: 20, ..RandomForestConfig::default() };
        let forest = RandomForest::fit(&x, &y, &cfg, 42);

        assert_eq!(forest.n_trees(), 20);
        assert_eq!(forest.n_features(), 2);
        let p = forest.predict(&[10.0, 3.0]);
        assert!((p - 31.0).abs() < 2.0, "got {}", p);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let (x, y) = linear_data();
        let cfg = RandomForestConfig { n_estimators: 5, max_features: Some(1), ..RandomForestConfig::default() };
        assert_eq!(RandomForest::fit(&x, &y, &cfg, 7), RandomForest::fit(&x, &y, &cfg, 7));
    }
}
