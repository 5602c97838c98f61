//! Candidate regressors and the serialized form of a fitted one.

pub mod boosting;
pub mod forest;
pub mod tree;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{GradientBoostingConfig, RandomForestConfig};
use boosting::GradientBoosting;
use forest::RandomForest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    GradientBoosting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedModel {
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
}

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedModel::RandomForest(_) => ModelKind::RandomForest,
            FittedModel::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            FittedModel::RandomForest(m) => m.n_features(),
            FittedModel::GradientBoosting(m) => m.n_features(),
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        match self {
            FittedModel::RandomForest(m) => m.predict(row),
            FittedModel::GradientBoosting(m) => m.predict(row),
        }
    }

    pub fn predict_all(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.predict(r)).collect()
    }
}

/// A regressor recipe the trainer can fit and compare. Adding a candidate
/// means adding an implementation; the selection rule stays untouched.
pub trait CandidateRegressor: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn fit(&self, x: &[Vec<f64>], y: &[f64], seed: u64) -> FittedModel;
}

impl CandidateRegressor for RandomForestConfig {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn fit(&self, x: &[Vec<f64>], y: &[f64], seed: u64) -> FittedModel {
        FittedModel::RandomForest(RandomForest::fit(x, y, self, seed))
    }
}

impl CandidateRegressor for GradientBoostingConfig {
    fn kind(&self) -> ModelKind {
        ModelKind::GradientBoosting
    }

    fn fit(&self, x: &[Vec<f64>], y: &[f64], seed: u64) -> FittedModel {
        FittedModel::GradientBoosting(GradientBoosting::fit(x, y, self, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_model_round_trips_through_json() {
        let x: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64, 1.0]).collect();
        let y: Vec<f64> = (0..30).map(|i| (i / 10) as f64).collect();
        let cfg = GradientBoostingConfig { n_estimators: 3, ..Default::default() };
        let model = cfg.fit(&x, &y, 42);

        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains(r#""kind":"gradient_boosting""#));
        let back: FittedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), ModelKind::GradientBoosting);
        assert_eq!(back.n_features(), 2);
        assert!((back.predict(&[25.0, 1.0]) - model.predict(&[25.0, 1.0])).abs() < 1e-9);
    }
}
