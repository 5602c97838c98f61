use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::prediction::{OptimalConfig, PredictionResult};
use crate::models::weather::WeatherReading;
use crate::services::regression::ModelKind;
use crate::services::trainer::TrainingReport;

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PanelConfigInput {
    /// Panel surface (m²), must be positive
    pub area: Option<f64>,
    /// Degrees from horizontal, defaults to 30
    pub tilt: Option<f64>,
    /// Degrees, 180 = south, defaults to 180
    pub azimuth: Option<f64>,
}

/// POST /api/predict body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PredictRequest {
    #[serde(default)]
    pub location: LocationInput,
    #[serde(default)]
    pub panel_config: PanelConfigInput,
    /// `daily` (default), `weekly` or `monthly`
    pub prediction_type: Option<String>,
    /// Caller-supplied conditions. Fetched for the site when absent.
    pub weather: Option<WeatherReading>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OptimalQuery {
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub area: f64,
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: PredictionResult,
    pub optimal_config: OptimalConfig,
    pub optimal_prediction: PredictionResult,
    pub improvement_percentage: f64,
    pub weather: WeatherReading,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherResponse {
    pub success: bool,
    pub data: WeatherReading,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModelInfo {
    pub model_kind: ModelKind,
    pub report: TrainingReport,
    pub retraining: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub model_ready: bool,
    pub retraining: bool,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_request_accepts_the_minimal_body() {
        let body = r#"{
            "location": { "latitude": 40.7128, "longitude": -74.006 },
            "panel_config": { "area": 10 }
        }"#;
        let req: PredictRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.location.latitude, Some(40.7128));
        assert_eq!(req.panel_config.area, Some(10.0));
        assert!(req.panel_config.tilt.is_none());
        assert!(req.prediction_type.is_none());
        assert!(req.weather.is_none());
    }

    #[test]
    fn predict_request_tolerates_missing_sections() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert!(req.location.latitude.is_none());
        assert!(req.panel_config.area.is_none());
    }
}
