//! Model artifact domain - the persisted classifier and its feature schema

mod entity;
mod schema;

pub use entity::{ModelArtifact, ModelInfo, ARTIFACT_FORMAT_VERSION, MODEL_TYPE, MODEL_TARGET};
pub use schema::FeatureSchema;
