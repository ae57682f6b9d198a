//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use self::metrics::{
    create_metrics_router, init_metrics, record_http_request, record_pipeline_stage,
    record_prediction, set_model_loaded, PredictionOutcome, PrometheusMetrics,
};
