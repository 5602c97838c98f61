use utoipa::OpenApi;
use crate::controllers::prediction_controller;
use crate::models::{api, prediction, weather};
use crate::services::{regression, trainer};

#[derive(OpenApi)]
#[openapi(
    paths(
        prediction_controller::predict,
        prediction_controller::get_optimal,
        prediction_controller::get_weather,
        prediction_controller::get_model_info,
        prediction_controller::retrain_model,
        prediction_controller::health,
        prediction_controller::get_config
    ),
    components(
        schemas(
            api::PredictRequest,
            api::LocationInput,
            api::PanelConfigInput,
            api::PredictResponse,
            api::WeatherResponse,
            api::ModelInfo,
            api::HealthStatus,
            prediction::Horizon,
            prediction::PeriodPower,
            prediction::PredictionResult,
            prediction::OptimalConfig,
            weather::WeatherReading,
            weather::ForecastEntry,
            regression::ModelKind,
            trainer::TrainingReport,
            trainer::CandidateScore
        )
    ),
    tags(
        (name = "solar-power-predictor", description = "Solar PV Power Prediction API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/predict",
            "/api/optimal",
            "/api/weather/{lat}/{lon}",
            "/api/model",
            "/api/model/retrain",
            "/api/health",
            "/api/config",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
