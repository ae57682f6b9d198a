//! Browser front-end for single-sample predictions
//!
//! The page is rendered on the server and talks to a [`PredictionProvider`],
//! which is either the remote prediction API or the in-process model.

pub mod form;
pub mod page;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::domain::PredictionProvider;
use form::{default_values, parse_submission};
use page::PageView;

#[derive(Clone)]
pub struct UiState {
    provider: Arc<dyn PredictionProvider>,
    base_path: String,
}

impl UiState {
    /// `base_path` is the prefix the router is mounted under ("" or "/ui")
    pub fn new(provider: Arc<dyn PredictionProvider>, base_path: impl Into<String>) -> Self {
        Self {
            provider,
            base_path: base_path.into().trim_end_matches('/').to_string(),
        }
    }

    fn action(&self) -> String {
        format!("{}/analyze", self.base_path)
    }

    async fn blank_view(&self) -> PageView {
        PageView {
            online: self.provider.health().await.ready,
            provider: self.provider.describe(),
            action: self.action(),
            values: default_values(),
            result: None,
            error: None,
            notice: None,
        }
    }
}

pub fn create_ui_router(state: UiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .with_state(state)
}

async fn index(State(state): State<UiState>) -> Html<String> {
    Html(page::render(&state.blank_view().await))
}

async fn analyze(
    State(state): State<UiState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    let mut view = state.blank_view().await;

    let submission = match parse_submission(&fields) {
        Ok(submission) => submission,
        Err(e) => {
            view.error = Some(e.to_string());
            return Html(page::render(&view));
        }
    };

    view.values = submission.values;
    if !submission.clamped.is_empty() {
        view.notice = Some(format!(
            "Adjusted to the allowed range: {}",
            submission.clamped.join(", ")
        ));
    }

    match state.provider.predict(&submission.sample()).await {
        Ok(result) => {
            info!(prediction = result.prediction, "Sample analyzed");
            view.result = Some(result);
        }
        Err(e) => {
            warn!("Prediction request failed: {}", e);
            view.error = Some(format!("⚠️ API request failed: {}", e));
        }
    }

    Html(page::render(&view))
}
