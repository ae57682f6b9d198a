//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::PredictionService;

/// State shared by every API handler.
///
/// The prediction service is built before the server binds and is never
/// mutated afterwards, so handlers only ever read it.
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<PredictionService>,
}

impl AppState {
    pub fn new(prediction_service: PredictionService) -> Self {
        Self {
            prediction_service: Arc::new(prediction_service),
        }
    }
}
