use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::config::Config;
use crate::error::PredictionError;
use crate::services::model_store::ModelStore;
use crate::services::prediction_service::PredictionEngine;
use crate::services::trainer::ModelArtifact;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Active artifact. Readers clone the inner `Arc`, so a swap never
    /// disturbs a request already in flight.
    pub artifact: Arc<RwLock<Option<Arc<ModelArtifact>>>>,
    pub model_store: Arc<ModelStore>,
    /// Source of the weekly/monthly day-to-day variation
    pub variation_rng: Arc<Mutex<StdRng>>,
    /// Set while a retrain runs
    pub retraining: Arc<AtomicBool>,
    pub started_at: DateTime<Utc>,
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl AppState {
    pub fn new(config: Config, model_store: ModelStore) -> Self {
        let rng = match config.model.variation_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config: Arc::new(config),
            artifact: Arc::new(RwLock::new(None)),
            model_store: Arc::new(model_store),
            variation_rng: Arc::new(Mutex::new(rng)),
            retraining: Arc::new(AtomicBool::new(false)),
            started_at: Utc::now(),
        }
    }

    pub fn artifact(&self) -> Result<Arc<ModelArtifact>, PredictionError> {
        self.artifact
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(PredictionError::ModelUnavailable)
    }

    pub fn engine(&self) -> Result<PredictionEngine, PredictionError> {
        self.artifact().map(PredictionEngine::new)
    }

    pub fn is_model_ready(&self) -> bool {
        self.artifact().is_ok()
    }

    /// Replaces the active artifact in one step.
    pub fn publish_artifact(&self, artifact: ModelArtifact) {
        let kind = artifact.report.model_kind;
        let r2 = artifact.report.r2;
        match self.artifact.write() {
            Ok(mut slot) => {
                *slot = Some(Arc::new(artifact));
                tracing::info!("published {:?} artifact (holdout R² {:.4})", kind, r2);
            }
            Err(e) => tracing::error!("artifact lock poisoned, publish skipped: {}", e),
        }
    }

    /// An independent generator for one request, seeded from the shared one.
    pub fn request_rng(&self) -> StdRng {
        match self.variation_rng.lock() {
            Ok(mut shared) => StdRng::seed_from_u64(shared.next_u64()),
            Err(_) => StdRng::from_entropy(),
        }
    }

    pub fn is_retraining(&self) -> bool {
        self.retraining.load(Ordering::Acquire)
    }

    /// `None` when a retrain is already running.
    pub fn begin_retrain(&self) -> Option<RetrainGuard> {
        self.retraining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RetrainGuard { flag: self.retraining.clone() })
    }
}

/// Clears the retraining flag when dropped.
pub struct RetrainGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RetrainGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
