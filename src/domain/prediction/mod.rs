//! Prediction domain - potability labels and the provider capability

mod entity;
mod provider;

pub use entity::{Potability, PredictionResult};
pub use provider::{PredictionProvider, ProviderHealth};

#[cfg(test)]
pub use provider::MockPredictionProvider;
