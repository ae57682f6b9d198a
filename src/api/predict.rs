//! Prediction endpoint

use axum::extract::State;
use tracing::debug;

use super::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{PredictionResult, WaterSample};

/// `POST /predict` - classify one water sample
pub async fn predict(
    State(state): State<AppState>,
    Json(sample): Json<WaterSample>,
) -> Result<Json<PredictionResult>, ApiError> {
    debug!(?sample, "Received prediction request");

    let result = state.prediction_service.classify(&sample)?;
    Ok(Json(result))
}
