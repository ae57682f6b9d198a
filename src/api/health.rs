//! Identity, liveness and readiness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::ModelInfo;

pub const SERVICE_MESSAGE: &str = "Water Potability Prediction API is running.";

/// Response of `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceIdentity {
    pub message: &'static str,
    pub version: &'static str,
    pub model_info: Option<ModelInfo>,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Response of `/health` and `/ready` when a model is loaded
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub model_loaded: bool,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceIdentity> {
    let service = &state.prediction_service;
    Json(ServiceIdentity {
        message: SERVICE_MESSAGE,
        version: env!("CARGO_PKG_VERSION"),
        model_info: service.model_info().cloned(),
        model_loaded: service.is_loaded(),
    })
}

/// Readiness: healthy only while a model is held
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    if !state.prediction_service.is_loaded() {
        return Err(ApiError::unavailable("Model not loaded").with_code("not_ready"));
    }

    Ok(Json(HealthResponse {
        status: HealthStatus::Healthy,
        model_loaded: true,
    }))
}

/// Liveness: succeeds as long as the process answers
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
