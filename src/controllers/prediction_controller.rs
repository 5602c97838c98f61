use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Local, Utc};

use crate::config::Config;
use crate::error::{ApiError, PredictionError};
use crate::models::api::{
    HealthStatus, ModelInfo, OptimalQuery, PredictRequest, PredictResponse, WeatherResponse,
};
use crate::models::prediction::{GeoLocation, Horizon, OptimalConfig, PanelConfig};
use crate::services::prediction_service::PredictionEngine;
use crate::services::trainer::TrainingReport;
use crate::services::weather_service;
use crate::shared_state::AppState;

/// POST /api/predict
/// Predict generation for a panel and compare it with the optimal orientation
///
/// Validates the location and panel, takes the weather from the request or
/// fetches it for the site, then returns the prediction for the requested
/// horizon next to the prediction for the recommended tilt/azimuth.
#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction and optimal comparison", body = PredictResponse),
        (status = 400, description = "Invalid location, panel or prediction type"),
        (status = 503, description = "No trained model is loaded yet")
    )
)]
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let location = GeoLocation::new(req.location.latitude, req.location.longitude)?;
    let panel = PanelConfig::new(req.panel_config.area, req.panel_config.tilt, req.panel_config.azimuth)?;
    let horizon: Horizon = req.prediction_type.as_deref().unwrap_or("daily").parse()?;
    let engine = state.engine()?;

    let mut rng = state.request_rng();
    let weather = match req.weather {
        Some(w) => w,
        None => {
            let cfg = &state.config.weather;
            weather_service::get_weather(
                location.latitude,
                location.longitude,
                cfg.offline_mode,
                Duration::from_secs(cfg.request_timeout_s),
                &mut rng,
            )
            .await
        }
    };

    let outcome = engine.compare_with_optimal(
        &location,
        &panel,
        &weather,
        horizon,
        Local::now().naive_local(),
        &mut rng,
    );
    tracing::info!(
        "{} prediction at ({:.4}, {:.4}): {:.1} Wh, optimal {:+.1}%",
        horizon,
        location.latitude,
        location.longitude,
        outcome.prediction.total_power,
        outcome.improvement_percentage
    );

    Ok(Json(PredictResponse {
        success: true,
        prediction: outcome.prediction,
        optimal_config: outcome.optimal_config,
        optimal_prediction: outcome.optimal_prediction,
        improvement_percentage: outcome.improvement_percentage,
        weather,
    }))
}

/// GET /api/weather/{lat}/{lon}
/// Current conditions for a site
///
/// Live Open-Meteo data when online, a generated demo reading otherwise.
#[utoipa::path(
    get,
    path = "/api/weather/{lat}/{lon}",
    params(
        ("lat" = f64, Path, description = "Latitude (°)"),
        ("lon" = f64, Path, description = "Longitude (°)")
    ),
    responses(
        (status = 200, description = "Weather reading", body = WeatherResponse),
        (status = 400, description = "Coordinates out of range")
    )
)]
pub async fn get_weather(
    Path((lat, lon)): Path<(f64, f64)>,
    State(state): State<AppState>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let location = GeoLocation::new(Some(lat), Some(lon))?;
    let cfg = &state.config.weather;
    let mut rng = state.request_rng();
    let data = weather_service::get_weather(
        location.latitude,
        location.longitude,
        cfg.offline_mode,
        Duration::from_secs(cfg.request_timeout_s),
        &mut rng,
    )
    .await;
    Ok(Json(WeatherResponse { success: true, data }))
}

/// GET /api/optimal
/// Recommended tilt and azimuth for a latitude
#[utoipa::path(
    get,
    path = "/api/optimal",
    params(OptimalQuery),
    responses(
        (status = 200, description = "Recommended orientation", body = OptimalConfig),
        (status = 400, description = "Latitude out of range")
    )
)]
pub async fn get_optimal(Query(q): Query<OptimalQuery>) -> Result<Json<OptimalConfig>, ApiError> {
    if !(-90.0..=90.0).contains(&q.latitude) {
        return Err(PredictionError::Configuration(format!("latitude {} out of range", q.latitude)).into());
    }
    Ok(Json(PredictionEngine::get_optimal_configuration(q.latitude, q.longitude, q.area)))
}

/// GET /api/model
/// Active model and its holdout metrics
#[utoipa::path(
    get,
    path = "/api/model",
    responses(
        (status = 200, description = "Active model", body = ModelInfo),
        (status = 503, description = "No trained model is loaded yet")
    )
)]
pub async fn get_model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    let artifact = state.artifact()?;
    Ok(Json(ModelInfo {
        model_kind: artifact.report.model_kind,
        report: artifact.report.clone(),
        retraining: state.is_retraining(),
    }))
}

/// POST /api/model/retrain
/// Retrain on fresh synthetic data and publish the winner
///
/// Training runs on a blocking worker. Predictions keep using the previous
/// artifact until the new one is published.
#[utoipa::path(
    post,
    path = "/api/model/retrain",
    responses(
        (status = 200, description = "Report of the newly published model", body = TrainingReport),
        (status = 409, description = "A retrain is already running"),
        (status = 500, description = "Training failed")
    )
)]
pub async fn retrain_model(State(state): State<AppState>) -> Result<Json<TrainingReport>, ApiError> {
    let _guard = state.begin_retrain().ok_or(ApiError::RetrainInProgress)?;
    tracing::info!("retrain requested");

    let store = state.model_store.clone();
    let artifact = tokio::task::spawn_blocking(move || store.retrain())
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

    let report = artifact.report.clone();
    state.publish_artifact(artifact);
    Ok(Json(report))
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.is_model_ready();
    let status = HealthStatus {
        status: if ready { "ok" } else { "starting" }.to_string(),
        model_ready: ready,
        retraining: state.is_retraining(),
        started_at: state.started_at,
    };
    (StatusCode::OK, Json(status))
}

/// GET /api/config
/// Effective configuration (defaults applied)
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Effective configuration")
    )
)]
pub async fn get_config(State(config): State<Arc<Config>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "config": &*config,
        "timestamp": Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::{LocationInput, PanelConfigInput};
    use crate::models::weather::WeatherReading;
    use crate::services::model_store::{MemoryArtifactStore, ModelStore};
    use crate::services::test_support;

    fn ready_state() -> AppState {
        let mut config = Config::default();
        config.model.variation_seed = Some(1);
        let store = ModelStore::new(Box::new(MemoryArtifactStore::new()), test_support::small_trainer());
        let state = AppState::new(config, store);
        state.publish_artifact((*test_support::small_artifact()).clone());
        state
    }

    fn request(prediction_type: Option<&str>) -> PredictRequest {
        PredictRequest {
            location: LocationInput { latitude: Some(40.7128), longitude: Some(-74.006) },
            panel_config: PanelConfigInput { area: Some(10.0), tilt: None, azimuth: None },
            prediction_type: prediction_type.map(str::to_string),
            weather: Some(WeatherReading {
                solar_irradiance: Some(800.0),
                temperature: Some(25.0),
                cloud_cover: Some(20.0),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn predict_defaults_to_daily() {
        let Json(resp) = predict(State(ready_state()), Json(request(None))).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.prediction.horizon, Horizon::Daily);
        assert_eq!(resp.prediction.breakdown.len(), 24);
        assert_eq!(resp.optimal_config.azimuth, 180.0);
        assert_eq!(resp.weather.solar_irradiance, Some(800.0));
    }

    #[tokio::test]
    async fn predict_rejects_unknown_horizon() {
        let err = predict(State(ready_state()), Json(request(Some("yearly")))).await.unwrap_err();
        assert!(matches!(err, ApiError::Prediction(PredictionError::UnsupportedHorizon(_))));
    }

    #[tokio::test]
    async fn predict_rejects_missing_area() {
        let mut req = request(Some("weekly"));
        req.panel_config.area = None;
        let err = predict(State(ready_state()), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Prediction(PredictionError::Configuration(_))));
    }

    #[tokio::test]
    async fn predict_without_model_is_unavailable() {
        let store = ModelStore::new(Box::new(MemoryArtifactStore::new()), test_support::small_trainer());
        let state = AppState::new(Config::default(), store);
        let err = predict(State(state), Json(request(None))).await.unwrap_err();
        assert!(matches!(err, ApiError::Prediction(PredictionError::ModelUnavailable)));
    }

    #[tokio::test]
    async fn optimal_for_southern_site_faces_north() {
        let q = OptimalQuery { latitude: -33.9, longitude: 18.4, area: 5.0 };
        let Json(cfg) = get_optimal(Query(q)).await.unwrap();
        assert_eq!(cfg.azimuth, 0.0);
        assert_eq!(cfg.tilt, 0.0);
    }

    #[tokio::test]
    async fn offline_weather_endpoint_answers() {
        let Json(resp) = get_weather(Path((45.07, 7.68)), State(ready_state())).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.forecast.len(), 8);
    }

    #[tokio::test]
    async fn concurrent_retrain_is_rejected() {
        let state = ready_state();
        let _running = state.begin_retrain().unwrap();
        let err = retrain_model(State(state)).await.unwrap_err();
        assert!(matches!(err, ApiError::RetrainInProgress));
    }
}
