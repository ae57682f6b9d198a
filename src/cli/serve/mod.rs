//! Serve command - prediction API and UI on the same port

use std::sync::Arc;

use axum::{Router, response::Redirect, routing::get};
use tokio::net::TcpListener;
use tracing::info;

use super::api::{build_socket_addr, create_api_router, load_state, shutdown_signal};
use crate::api::AppState;
use crate::config::AppConfig;
use crate::domain::PredictionProvider;
use crate::ui::{UiState, create_ui_router};

pub const UI_PREFIX: &str = "/ui";

/// Run the combined API + UI server. The UI predicts in-process with the
/// same model the API serves.
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let app = create_combined_router(&config, load_state(&config));

    let addr = build_socket_addr(&config.server.host, config.server.port)?;
    info!("Starting server (API + UI at {}) on {}", UI_PREFIX, addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn create_combined_router(config: &AppConfig, state: AppState) -> Router {
    let provider: Arc<dyn PredictionProvider> = state.prediction_service.clone();
    let ui = create_ui_router(UiState::new(provider, UI_PREFIX));

    create_api_router(config, state)
        .nest(UI_PREFIX, ui)
        .route(
            &format!("{}/", UI_PREFIX),
            get(|| async { Redirect::permanent(UI_PREFIX) }),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::services::PredictionService;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.metrics.enabled = false;
        config
    }

    #[tokio::test]
    async fn test_ui_is_mounted_under_prefix() {
        let app = create_combined_router(&config(), AppState::new(PredictionService::unloaded()));

        let response = app
            .oneshot(Request::builder().uri("/ui").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("action=\"/ui/analyze\""));
        assert!(html.contains("in-process model (not loaded)"));
    }

    #[tokio::test]
    async fn test_trailing_slash_redirects_to_ui() {
        let app = create_combined_router(&config(), AppState::new(PredictionService::unloaded()));

        let response = app
            .oneshot(Request::builder().uri("/ui/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/ui");
    }

    #[tokio::test]
    async fn test_api_routes_still_served() {
        let app = create_combined_router(&config(), AppState::new(PredictionService::unloaded()));

        let response = app
            .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
