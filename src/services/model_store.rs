//! Artifact persistence.
//!
//! The scaler and the regressor are stored under two well-known keys. Any
//! failure to load them (absent, unreadable, malformed, wrong layout) falls
//! back to a full retrain whose result overwrites what was there.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use super::regression::FittedModel;
use super::scaler::StandardScaler;
use super::trainer::{ModelArtifact, ModelTrainer, TrainingReport};

pub const SCALER_KEY: &str = "scaler";
pub const MODEL_KEY: &str = "solar_power_model";

/// Byte storage addressed by key.
pub trait ArtifactStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PredictionError>;

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), PredictionError>;
}

/// One `<key>.json` file per artifact inside a directory.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PredictionError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PredictionError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temporary file then renames, so readers never see a partial file.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), PredictionError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PredictionError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| PredictionError::Persistence("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), PredictionError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PredictionError::Persistence("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct ModelRecord {
    model: FittedModel,
    report: TrainingReport,
}

#[derive(Serialize)]
struct ModelRecordRef<'a> {
    model: &'a FittedModel,
    report: &'a TrainingReport,
}

pub struct ModelStore {
    store: Box<dyn ArtifactStore>,
    trainer: ModelTrainer,
}

impl ModelStore {
    pub fn new(store: Box<dyn ArtifactStore>, trainer: ModelTrainer) -> Self {
        Self { store, trainer }
    }

    /// `Ok(None)` when either key is absent.
    pub fn load(&self) -> Result<Option<ModelArtifact>, PredictionError> {
        let (Some(scaler_bytes), Some(model_bytes)) =
            (self.store.load(SCALER_KEY)?, self.store.load(MODEL_KEY)?)
        else {
            return Ok(None);
        };

        let scaler: StandardScaler = serde_json::from_slice(&scaler_bytes)?;
        let record: ModelRecord = serde_json::from_slice(&model_bytes)?;
        let artifact = ModelArtifact {
            scaler,
            model: record.model,
            report: record.report,
        };
        artifact.validate()?;
        Ok(Some(artifact))
    }

    pub fn save(&self, artifact: &ModelArtifact) -> Result<(), PredictionError> {
        let scaler = serde_json::to_vec(&artifact.scaler)?;
        let model = serde_json::to_vec(&ModelRecordRef {
            model: &artifact.model,
            report: &artifact.report,
        })?;
        self.store.save(SCALER_KEY, &scaler)?;
        self.store.save(MODEL_KEY, &model)?;
        Ok(())
    }

    /// Trains a fresh artifact and persists it. A failed save is logged; the
    /// artifact is still returned so it can be served.
    pub fn retrain(&self) -> Result<ModelArtifact, PredictionError> {
        let artifact = self.trainer.train()?;
        match self.save(&artifact) {
            Ok(()) => tracing::info!("model artifacts saved"),
            Err(e) => tracing::warn!("could not persist trained model: {}", e),
        }
        Ok(artifact)
    }

    /// Startup path: reuse persisted artifacts when they load cleanly, otherwise retrain.
    pub fn load_or_train(&self) -> Result<ModelArtifact, PredictionError> {
        match self.load() {
            Ok(Some(artifact)) => {
                tracing::info!(
                    "model loaded ({:?}, holdout R² {:.4}, trained {})",
                    artifact.report.model_kind,
                    artifact.report.r2,
                    artifact.report.trained_at
                );
                return Ok(artifact);
            }
            Ok(None) => tracing::info!("no existing model found, training a new one"),
            Err(e) => tracing::warn!("error loading model ({}), training a new one", e),
        }
        self.retrain()
    }
}
