//! Model training: synthetic data → 80/20 split → scaler → candidates → best R².

use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ModelConfig;
use crate::error::PredictionError;
use super::features::FEATURE_COUNT;
use super::regression::{CandidateRegressor, FittedModel, ModelKind};
use super::scaler::StandardScaler;
use super::synthetic_data::{Dataset, SyntheticDataGenerator};

// ─── Metrics ─────────────────────────────────────────────────────────────────

pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum::<f64>() / y_true.len() as f64
}

pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / y_true.len() as f64
}

/// Coefficient of determination. A constant target scores 1 when matched exactly, else 0.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

// ─── Split ───────────────────────────────────────────────────────────────────

pub struct Split {
    pub x_train: Vec<Vec<f64>>,
    pub y_train: Vec<f64>,
    pub x_test: Vec<Vec<f64>>,
    pub y_test: Vec<f64>,
}

/// Seeded shuffle, then the first `ceil(test_fraction · n)` rows become the holdout.
pub fn train_test_split(data: &Dataset, test_fraction: f64, seed: u64) -> Result<Split, PredictionError> {
    let n = data.len();
    let n_test = (test_fraction.clamp(0.0, 1.0) * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PredictionError::Training(format!(
            "cannot hold out {} of {} samples",
            n_test, n
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test, train) = order.split_at(n_test);

    let take = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<f64>) {
        idx.iter().map(|&i| (data.features[i].clone(), data.targets[i])).unzip()
    };
    let (x_train, y_train) = take(train);
    let (x_test, y_test) = take(test);
    Ok(Split { x_train, y_train, x_test, y_test })
}

// ─── Artifact ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CandidateScore {
    pub kind: ModelKind,
    pub r2: f64,
}

/// Holdout quality of the selected model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrainingReport {
    pub model_kind: ModelKind,
    pub mae: f64,
    pub mse: f64,
    pub r2: f64,
    pub candidates: Vec<CandidateScore>,
    pub training_samples: usize,
    pub holdout_samples: usize,
    pub trained_at: DateTime<Utc>,
}

/// Fitted scaler + regressor pair. Immutable once built; retraining produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    pub scaler: StandardScaler,
    pub model: FittedModel,
    pub report: TrainingReport,
}

impl ModelArtifact {
    /// Both halves must agree on the 14-column layout.
    pub fn validate(&self) -> Result<(), PredictionError> {
        if self.scaler.n_features() != FEATURE_COUNT {
            return Err(PredictionError::Persistence(format!(
                "scaler expects {} features, not {}",
                self.scaler.n_features(),
                FEATURE_COUNT
            )));
        }
        if self.model.n_features() != FEATURE_COUNT {
            return Err(PredictionError::Persistence(format!(
                "model expects {} features, not {}",
                self.model.n_features(),
                FEATURE_COUNT
            )));
        }
        Ok(())
    }

    pub fn predict(&self, scaled_row: &[f64]) -> f64 {
        self.model.predict(scaled_row)
    }
}

// ─── Trainer ─────────────────────────────────────────────────────────────────

pub struct ModelTrainer {
    generator: SyntheticDataGenerator,
    test_fraction: f64,
    seed: u64,
    candidates: Vec<Box<dyn CandidateRegressor>>,
}

impl ModelTrainer {
    pub fn new(generator: SyntheticDataGenerator, test_fraction: f64, seed: u64) -> Self {
        Self {
            generator,
            test_fraction,
            seed,
            candidates: Vec::new(),
        }
    }

    /// Random forest and gradient boosting with the configured hyperparameters.
    pub fn from_config(cfg: &ModelConfig) -> Self {
        Self::new(
            SyntheticDataGenerator::new(cfg.training_samples, cfg.seed),
            cfg.test_fraction,
            cfg.seed,
        )
        .with_candidate(Box::new(cfg.random_forest.clone()))
        .with_candidate(Box::new(cfg.gradient_boosting.clone()))
    }

    pub fn with_candidate(mut self, candidate: Box<dyn CandidateRegressor>) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn train(&self) -> Result<ModelArtifact, PredictionError> {
        tracing::info!("generating training data ({} samples)", self.generator.n_samples);
        let data = self.generator.generate()?;
        self.train_on(&data)
    }

    pub fn train_on(&self, data: &Dataset) -> Result<ModelArtifact, PredictionError> {
        if self.candidates.is_empty() {
            return Err(PredictionError::Training("no candidate regressors configured".to_string()));
        }

        let split = train_test_split(data, self.test_fraction, self.seed)?;
        let scaler = StandardScaler::fit(&split.x_train)?;
        let x_train = scaler.transform_all(&split.x_train);
        let x_test = scaler.transform_all(&split.x_test);

        let mut scores = Vec::with_capacity(self.candidates.len());
        let mut best: Option<(FittedModel, Vec<f64>, f64)> = None;

        for candidate in &self.candidates {
            let model = candidate.fit(&x_train, &split.y_train, self.seed);
            let y_pred = model.predict_all(&x_test);
            let r2 = r2_score(&split.y_test, &y_pred);
            tracing::info!("candidate {:?}: holdout R² = {:.4}", candidate.kind(), r2);
            scores.push(CandidateScore { kind: candidate.kind(), r2 });

            if best.as_ref().is_none_or(|(_, _, best_r2)| r2 > *best_r2) {
                best = Some((model, y_pred, r2));
            }
        }

        let Some((model, y_pred, r2)) = best else {
            return Err(PredictionError::Training("no candidate produced a model".to_string()));
        };

        let report = TrainingReport {
            model_kind: model.kind(),
            mae: mean_absolute_error(&split.y_test, &y_pred),
            mse: mean_squared_error(&split.y_test, &y_pred),
            r2,
            candidates: scores,
            training_samples: split.y_train.len(),
            holdout_samples: split.y_test.len(),
            trained_at: Utc::now(),
        };
        tracing::info!(
            "selected {:?}: MAE {:.2}, MSE {:.2}, R² {:.4}",
            report.model_kind,
            report.mae,
            report.mse,
            report.r2
        );

        Ok(ModelArtifact { scaler, model, report })
    }
}
