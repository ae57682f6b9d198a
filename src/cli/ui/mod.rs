//! UI command - runs the UI server on its own port

use std::sync::Arc;

use clap::{Args, ValueEnum};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::api::{build_socket_addr, load_state, shutdown_signal};
use crate::config::AppConfig;
use crate::domain::PredictionProvider;
use crate::infrastructure::prediction::RemotePredictionClient;
use crate::ui::{UiState, create_ui_router};

/// Where the UI gets its predictions from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Call the prediction API over HTTP
    Remote,
    /// Load the model into this process
    Local,
}

/// Arguments for the UI command
#[derive(Args, Clone, Debug)]
pub struct UiArgs {
    #[arg(long, value_enum, default_value_t = Backend::Remote)]
    pub backend: Backend,

    /// Prediction API base URL (overrides config)
    #[arg(long, env = "API_BASE_URL")]
    pub api_url: Option<String>,

    /// Port to serve the UI on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Run the UI server
pub async fn run(args: UiArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let provider = build_provider(&args, &config);
    info!("UI predictions served by {}", provider.describe());

    let app = create_ui_router(UiState::new(provider, "")).layer(TraceLayer::new_for_http());

    let addr = build_socket_addr(&config.server.host, args.port.unwrap_or(config.ui.port))?;
    info!("Starting UI server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_provider(args: &UiArgs, config: &AppConfig) -> Arc<dyn PredictionProvider> {
    match args.backend {
        Backend::Remote => {
            let base_url = args
                .api_url
                .clone()
                .unwrap_or_else(|| config.ui.api_base_url.clone());
            Arc::new(RemotePredictionClient::new(base_url))
        }
        Backend::Local => {
            let service: Arc<dyn PredictionProvider> = load_state(config).prediction_service;
            service
        }
    }
}
