//! Small, fast training setups shared by unit tests.

use std::sync::{Arc, OnceLock};

use crate::config::{GradientBoostingConfig, ModelConfig, RandomForestConfig};
use super::trainer::{ModelArtifact, ModelTrainer};

pub fn small_model_config() -> ModelConfig {
    ModelConfig {
        training_samples: 1_500,
        random_forest: RandomForestConfig {
            n_estimators: 12,
            max_depth: Some(10),
            min_samples_leaf: 3,
            ..RandomForestConfig::default()
        },
        gradient_boosting: GradientBoostingConfig {
            n_estimators: 50,
            ..GradientBoostingConfig::default()
        },
        ..ModelConfig::default()
    }
}

pub fn small_trainer() -> ModelTrainer {
    ModelTrainer::from_config(&small_model_config())
}

/// Trained once per test binary.
pub fn small_artifact() -> Arc<ModelArtifact> {
    static ARTIFACT: OnceLock<Arc<ModelArtifact>> = OnceLock::new();
    ARTIFACT
        .get_or_init(|| Arc::new(small_trainer().train().expect("small training run")))
        .clone()
}
