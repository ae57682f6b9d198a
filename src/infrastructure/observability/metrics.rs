//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = PrometheusBuilder::new();

    match builder.install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("aquasafe_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric. `route` is the matched route template,
/// so label cardinality stays bounded by the router.
pub fn record_http_request(method: &str, route: &str, status: u16, duration: Duration) {
    let status_str = status.to_string();
    let labels = [
        ("method", method.to_string()),
        ("path", route.to_string()),
        ("status", status_str),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// How a single prediction call ended
#[derive(Debug, Clone, Copy)]
pub enum PredictionOutcome<'a> {
    /// Predicted label (0 or 1)
    Label(u8),
    /// Error kind, see `DomainError::kind`
    Failed(&'a str),
}

/// Record a prediction served by the in-process model
pub fn record_prediction(outcome: PredictionOutcome<'_>, duration: Duration) {
    match outcome {
        PredictionOutcome::Label(label) => {
            counter!("predictions_total", "label" => label.to_string()).increment(1);
        }
        PredictionOutcome::Failed(kind) => {
            counter!("prediction_errors_total", "kind" => kind.to_string()).increment(1);
        }
    }
    histogram!("prediction_duration_seconds").record(duration.as_secs_f64());
}

pub fn set_model_loaded(loaded: bool) {
    gauge!("model_loaded").set(if loaded { 1.0 } else { 0.0 });
}

/// Record the outcome of a pipeline stage
pub fn record_pipeline_stage(stage: &str, success: bool, duration: Duration) {
    let labels = [
        ("stage", stage.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("pipeline_stage_runs_total", &labels).increment(1);
    histogram!("pipeline_stage_duration_seconds", &labels).record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_prediction(PredictionOutcome::Label(1), Duration::from_millis(2));
        record_prediction(PredictionOutcome::Failed("not_ready"), Duration::from_millis(1));
        set_model_loaded(false);
        record_pipeline_stage("train", true, Duration::from_secs(1));
        record_http_request("POST", "/predict", 200, Duration::from_millis(3));
    }
}
