//! Domain layer - Core business logic and entities

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod forest;
pub mod prediction;
pub mod sample;
pub mod tracking;

pub use artifact::{FeatureSchema, ModelArtifact, ModelInfo};
pub use dataset::{Dataset, LabeledData};
pub use error::DomainError;
pub use evaluation::{ClassificationMetrics, ConfusionMatrix, MetricsDocument};
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use prediction::{Potability, PredictionProvider, PredictionResult, ProviderHealth};
pub use sample::{WaterSample, FEATURE_COUNT, FEATURE_NAMES, LABEL_COLUMN};
pub use tracking::{ExperimentTracker, RunId, RunStatus, TrackedRun, TrackingEvent};
