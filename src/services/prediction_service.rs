//! The engine's public contract: feature preparation, horizon prediction and
//! the optimal-orientation comparison, all against one immutable artifact.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rand::Rng;

use crate::models::prediction::{
    GeoLocation, Horizon, OptimalConfig, OptimizationOutcome, PanelConfig, PredictionResult,
};
use crate::models::weather::WeatherReading;
use super::features::{ScaledFeatures, assemble_features, scale_features};
use super::optimal::{improvement_percentage, optimal_configuration};
use super::synthesizer::synthesize;
use super::trainer::ModelArtifact;

#[derive(Debug, Clone)]
pub struct PredictionEngine {
    artifact: Arc<ModelArtifact>,
}

impl PredictionEngine {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Scaled features for "now" (server local time).
    pub fn prepare_features(
        &self,
        location: &GeoLocation,
        panel: &PanelConfig,
        weather: &WeatherReading,
    ) -> ScaledFeatures {
        self.prepare_features_at(location, panel, weather, Local::now().naive_local())
    }

    pub fn prepare_features_at(
        &self,
        location: &GeoLocation,
        panel: &PanelConfig,
        weather: &WeatherReading,
        at: NaiveDateTime,
    ) -> ScaledFeatures {
        let raw = assemble_features(location, panel, weather, at);
        scale_features(&self.artifact.scaler, &raw)
    }

    /// One model inference, reshaped to the requested horizon.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        features: &ScaledFeatures,
        horizon: Horizon,
        rng: &mut R,
    ) -> PredictionResult {
        let base = self.artifact.predict(features.as_slice());
        synthesize(base, horizon, rng)
    }

    /// Depends on latitude only; longitude and area are accepted for API symmetry.
    pub fn get_optimal_configuration(latitude: f64, _longitude: f64, _panel_area: f64) -> OptimalConfig {
        optimal_configuration(latitude)
    }

    /// Predicts the requested configuration and the recommended one under the
    /// same weather and time, and reports the relative gain.
    pub fn compare_with_optimal<R: Rng + ?Sized>(
        &self,
        location: &GeoLocation,
        panel: &PanelConfig,
        weather: &WeatherReading,
        horizon: Horizon,
        at: NaiveDateTime,
        rng: &mut R,
    ) -> OptimizationOutcome {
        let features = self.prepare_features_at(location, panel, weather, at);
        let prediction = self.predict(&features, horizon, rng);

        let optimal_config =
            Self::get_optimal_configuration(location.latitude, location.longitude, panel.area_m2);
        let optimal_panel = panel.with_orientation(optimal_config);
        let optimal_features = self.prepare_features_at(location, &optimal_panel, weather, at);
        let optimal_prediction = self.predict(&optimal_features, horizon, rng);

        let improvement = improvement_percentage(prediction.total_power, optimal_prediction.total_power);
        tracing::debug!(
            "requested {:.1} Wh vs optimal {:.1} Wh ({:+.1}%)",
            prediction.total_power,
            optimal_prediction.total_power,
            improvement
        );

        OptimizationOutcome {
            prediction,
            optimal_config,
            optimal_prediction,
            improvement_percentage: improvement,
        }
    }
}
