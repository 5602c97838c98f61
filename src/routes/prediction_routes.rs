use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::prediction_controller::{
    // Prediction
    predict, get_optimal,
    // Weather
    get_weather,
    // Model lifecycle
    get_model_info, retrain_model,
    // Service
    health, get_config,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` or `State<Arc<Config>>` via `FromRef`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/predict",            post(predict))
        .route("/optimal",            get(get_optimal))
        .route("/weather/{lat}/{lon}", get(get_weather))
        .route("/model",              get(get_model_info))
        .route("/model/retrain",      post(retrain_model))
        .route("/health",             get(health))
        .route("/config",             get(get_config))
        .with_state(state)
}
