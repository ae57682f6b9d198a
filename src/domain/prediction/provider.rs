//! Prediction provider trait
//!
//! The presentation layer obtains predictions through this capability,
//! either from a remote prediction API or from a model held in-process.

use async_trait::async_trait;
use serde::Serialize;

use super::PredictionResult;
use crate::domain::error::DomainError;
use crate::domain::sample::WaterSample;

#[cfg(test)]
use mockall::automock;

/// Readiness of a prediction provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderHealth {
    pub ready: bool,
}

/// Anything that can turn a water sample into a potability verdict
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    /// Classify a single sample
    async fn predict(&self, sample: &WaterSample) -> Result<PredictionResult, DomainError>;

    /// Whether the provider can currently serve predictions
    async fn health(&self) -> ProviderHealth;

    /// Short description shown in the UI ("remote http://..." / "in-process")
    fn describe(&self) -> String;
}
