//! API command - runs the prediction API only

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::{AppState, create_router};
use crate::config::AppConfig;
use crate::infrastructure::artifact::ArtifactStore;
use crate::infrastructure::observability::{create_metrics_router, init_metrics};
use crate::infrastructure::services::PredictionService;

/// Run the API-only server
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let app = create_api_router(&config, load_state(&config));

    let addr = build_socket_addr(&config.server.host, config.server.port)?;
    info!("Starting prediction API on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server shutdown complete");
    Ok(())
}

/// Load the model before binding; a missing or invalid artifact leaves the
/// service degraded instead of failing startup
pub(crate) fn load_state(config: &AppConfig) -> AppState {
    let store = ArtifactStore::from_config(&config.model);
    AppState::new(PredictionService::load(&store))
}

/// Prediction routes plus the Prometheus endpoint when enabled
pub(crate) fn create_api_router(config: &AppConfig, state: AppState) -> Router {
    let router = create_router(state);

    match init_metrics(&config.metrics) {
        Some(metrics) => router.merge(create_metrics_router(metrics, &config.metrics.path)),
        None => router,
    }
}

pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

pub(crate) fn build_socket_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((host.parse::<IpAddr>()?, port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr() {
        let addr = build_socket_addr("0.0.0.0", 8000).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8000");
        assert!(build_socket_addr("localhost", 8000).is_err());
    }

    #[test]
    fn test_missing_model_gives_degraded_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.model.primary_path = dir.path().join("a.json").display().to_string();
        config.model.fallback_path = dir.path().join("b.json").display().to_string();

        let state = load_state(&config);
        assert!(!state.prediction_service.is_loaded());
    }
}
