use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PredictionError;

fn default_port() -> u16 { 8080 }
fn default_artifact_dir() -> String { "models".to_string() }
fn default_training_samples() -> usize { 10_000 }
fn default_seed() -> u64 { 42 }
fn default_test_fraction() -> f64 { 0.2 }
fn default_offline_mode() -> bool { true }
fn default_request_timeout_s() -> u64 { 10 }

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// Training and artifact settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
    #[serde(default = "default_training_samples")]
    pub training_samples: usize,
    /// Seeds data generation, the train/holdout split and every candidate.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default)]
    pub random_forest: RandomForestConfig,
    #[serde(default)]
    pub gradient_boosting: GradientBoostingConfig,
    /// Seed for the weekly/monthly day-to-day variation. `None` draws from entropy.
    #[serde(default)]
    pub variation_seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            training_samples: default_training_samples(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            random_forest: RandomForestConfig::default(),
            gradient_boosting: GradientBoostingConfig::default(),
            variation_seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RandomForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` means all of them.
    pub max_features: Option<usize>,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 60,
            max_depth: Some(12),
            min_samples_split: 2,
            min_samples_leaf: 4,
            max_features: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GradientBoostingConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WeatherConfig {
    /// Skip Open-Meteo and always use the offline demo reading.
    #[serde(default = "default_offline_mode")]
    pub offline_mode: bool,
    #[serde(default = "default_request_timeout_s")]
    pub request_timeout_s: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            offline_mode: default_offline_mode(),
            request_timeout_s: default_request_timeout_s(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PredictionError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PredictionError::Configuration(format!("invalid {}: {}", path.display(), e))
        })
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "server": {{ "port": 9000 }}, "model": {{ "training_samples": 500 }} }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.model.training_samples, 500);
        assert_eq!(config.model.seed, 42);
        assert_eq!(config.model.artifact_dir, "models");
        assert_eq!(config.model.random_forest, RandomForestConfig::default());
        assert!(config.weather.offline_mode);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.training_samples, 10_000);
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Config::load(file.path()), Err(PredictionError::Configuration(_))));
    }
}
