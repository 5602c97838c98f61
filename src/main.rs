use std::net::SocketAddr;

use axum::{Router, routing::get, response::Html};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use solar_power_predictor::api_docs::ApiDoc;
use solar_power_predictor::config::Config;
use solar_power_predictor::routes::prediction_routes::api_routes;
use solar_power_predictor::services::model_store::{FileArtifactStore, ModelStore};
use solar_power_predictor::services::trainer::ModelTrainer;
use solar_power_predictor::shared_state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("solar_power_predictor=info,tower_http=info")),
        )
        .init();

    // 1. Load configuration
    let config_path = std::env::var("SOLAR_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = match Config::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to load {}: {}", config_path, e);
            return;
        }
    };
    tracing::info!(
        "configuration loaded from {} (artifacts in {}, offline weather: {})",
        config_path,
        config.model.artifact_dir,
        config.weather.offline_mode
    );

    // 2. Model store and shared state
    let store = match FileArtifactStore::new(&config.model.artifact_dir) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("cannot open artifact directory {}: {}", config.model.artifact_dir, e);
            return;
        }
    };
    let trainer = ModelTrainer::from_config(&config.model);
    let state = AppState::new(config.clone(), ModelStore::new(Box::new(store), trainer));

    // 3. Load or train the model off the async runtime
    let store = state.model_store.clone();
    match tokio::task::spawn_blocking(move || store.load_or_train()).await {
        Ok(Ok(artifact)) => state.publish_artifact(artifact),
        Ok(Err(e)) => {
            tracing::error!("model initialisation failed: {}", e);
            return;
        }
        Err(e) => {
            tracing::error!("model initialisation task panicked: {}", e);
            return;
        }
    }

    // 4. Start Axum HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state.clone()))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        tracing::error!("server error: {}", e);
    }
}
