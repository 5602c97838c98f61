use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::config::GradientBoostingConfig;
use super::tree::{RegressionTree, TreeParams};

/// Least-squares gradient boosting: start from the mean and fit each stage
/// to the current residuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosting {
    init: f64,
    learning_rate: f64,
    stages: Vec<RegressionTree>,
}

impl GradientBoosting {
    pub fn fit(x: &[Vec<f64>], y: &[f64], cfg: &GradientBoostingConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = TreeParams {
            max_depth: Some(cfg.max_depth),
            min_samples_split: 2,
            min_samples_leaf: cfg.min_samples_leaf,
            max_features: None,
        };

        let n = y.len();
        let init = if n == 0 { 0.0 } else { y.iter().sum::<f64>() / n as f64 };
        let all: Vec<usize> = (0..n).collect();
        let mut current = vec![init; n];
        let mut residuals = vec![0.0; n];
        let mut stages = Vec::with_capacity(cfg.n_estimators);

        for _ in 0..cfg.n_estimators {
            for ((r, target), f) in residuals.iter_mut().zip(y).zip(&current) {
                *r = target - f;
            }
            let tree = RegressionTree::fit(x, &residuals, &all, &params, &mut rng);
            for (f, row) in current.iter_mut().zip(x) {
                *f += cfg.learning_rate * tree.predict(row);
            }
            stages.push(tree);
        }

        Self { init, learning_rate: cfg.learning_rate, stages }
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn n_features(&self) -> usize {
        self.stages.first().map_or(0, |t| t.n_features())
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.init + self.learning_rate * self.stages.iter().map(|t| t.predict(row)).sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_fitting_reduces_error() {
        let x: Vec<Vec<f64>> = (0..120).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| (r[0] / 20.0).sin() * 10.0).collect();

        let sse = |m: &GradientBoosting| -> f64 {
            x.iter().zip(&y).map(|(r, t)| (m.predict(r) - t).powi(2)).sum()
        };

        let few = GradientBoosting::fit(&x, &y, &GradientBoostingConfig { n_estimators: 5, ..Default::default() }, 42);
        let many = GradientBoosting::fit(&x, &y, &GradientBoostingConfig { n_estimators: 80, ..Default::default() }, 42);

        assert_eq!(many.n_stages(), 80);
        assert!(sse(&many) < sse(&few));
        assert!(sse(&many) / 120.0 < 5.0, "mse {}", sse(&many) / 120.0);
    }

    #[test]
    fn zero_stages_predicts_the_mean() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0]];
        let y = vec![1.0, 2.0, 6.0];
        let model = GradientBoosting::fit(&x, &y, &GradientBoostingConfig { n_estimators: 0, ..Default::default() }, 1);
        assert_eq!(model.predict(&[5.0]), 3.0);
    }
}
