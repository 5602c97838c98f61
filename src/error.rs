//! Error types for the prediction engine and its HTTP boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures the engine can report.
#[derive(Error, Debug)]
pub enum PredictionError {
    /// Missing or invalid location / panel parameters. Rejected before the engine runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("model is not available: no trained artifact has been loaded")]
    ModelUnavailable,

    #[error("unsupported prediction horizon '{0}' (expected daily, weekly or monthly)")]
    UnsupportedHorizon(String),

    /// Artifact load/save failure. Loads recover by retraining.
    #[error("artifact persistence error: {0}")]
    Persistence(String),

    #[error("model training failed: {0}")]
    Training(String),
}

impl From<serde_json::Error> for PredictionError {
    fn from(e: serde_json::Error) -> Self {
        PredictionError::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for PredictionError {
    fn from(e: std::io::Error) -> Self {
        PredictionError::Persistence(e.to_string())
    }
}

/// Error surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("model retraining is already in progress")]
    RetrainInProgress,

    #[error("background task failed: {0}")]
    Task(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Prediction(PredictionError::Configuration(_))
            | ApiError::Prediction(PredictionError::UnsupportedHorizon(_)) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(PredictionError::ModelUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RetrainInProgress => StatusCode::CONFLICT,
            ApiError::Prediction(PredictionError::Persistence(_))
            | ApiError::Prediction(PredictionError::Training(_))
            | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
