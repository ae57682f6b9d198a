//! Evaluation domain - binary classification metrics

mod metrics;

pub use metrics::{ClassificationMetrics, ConfusionMatrix, MetricsDocument};
