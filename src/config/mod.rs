//! Application and pipeline configuration

mod app_config;
mod params;

pub use app_config::{
    AppConfig, DataConfig, LogFormat, LoggingConfig, MetricsConfig, ModelConfig, ServerConfig,
    TrackingConfig, UiConfig,
};
pub use params::{DataCollectionParams, ModelBuildingParams, PipelineParams};
