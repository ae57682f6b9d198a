//! Model artifact entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeatureSchema;
use crate::domain::error::DomainError;
use crate::domain::forest::{ForestParams, RandomForest};

/// Current on-disk format version
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

pub const MODEL_TYPE: &str = "Random Forest Classifier";
pub const MODEL_TARGET: &str = "Water Potability";

/// A trained classifier together with the schema it expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub schema: FeatureSchema,
    pub model_type: String,
    pub target: String,
    pub params: ForestParams,
    pub trained_at: DateTime<Utc>,
    pub training_accuracy: f64,
    pub n_training_samples: usize,
    pub forest: RandomForest,
}

/// Descriptive metadata about the loaded model, reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub model_type: String,
    pub target: String,
}

impl ModelArtifact {
    pub fn new(
        schema: FeatureSchema,
        params: ForestParams,
        forest: RandomForest,
        training_accuracy: f64,
        n_training_samples: usize,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            schema,
            model_type: MODEL_TYPE.to_string(),
            target: MODEL_TARGET.to_string(),
            params,
            trained_at: Utc::now(),
            training_accuracy,
            n_training_samples,
            forest,
        }
    }

    /// Internal consistency: known format, intact fingerprint, forest shape
    /// agreeing with the schema
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(DomainError::artifact(format!(
                "unsupported artifact format version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        self.schema.verify_fingerprint()?;
        self.forest.validate()?;

        if self.forest.n_features() != self.schema.feature_names.len() {
            return Err(DomainError::artifact(format!(
                "forest expects {} features but schema lists {}",
                self.forest.n_features(),
                self.schema.feature_names.len()
            )));
        }

        Ok(())
    }

    pub fn info(&self, model_path: impl Into<String>) -> ModelInfo {
        ModelInfo {
            model_path: model_path.into(),
            model_type: self.model_type.clone(),
            target: self.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_artifact() -> ModelArtifact {
        let features = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.1, 0.2], vec![0.9, 0.8]];
        let labels = vec![0, 1, 0, 1];
        let params = ForestParams::new(2);
        let forest = RandomForest::fit(&features, &labels, 2, &params).unwrap();
        let schema = FeatureSchema::new(vec!["a".into(), "b".into()], "label");

        ModelArtifact::new(schema, params, forest, 1.0, 4)
    }

    #[test]
    fn test_new_artifact_is_valid() {
        let artifact = tiny_artifact();
        assert_eq!(artifact.format_version, ARTIFACT_FORMAT_VERSION);
        assert_eq!(artifact.model_type, "Random Forest Classifier");
        assert!(artifact.validate().is_ok());
    }

    #[test]
    fn test_schema_forest_mismatch_rejected() {
        let mut artifact = tiny_artifact();
        artifact.schema = FeatureSchema::new(vec!["a".into()], "label");
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut artifact = tiny_artifact();
        artifact.format_version = 99;
        let err = artifact.validate().unwrap_err();
        assert!(err.to_string().contains("format version 99"));
    }

    #[test]
    fn test_info() {
        let info = tiny_artifact().info("models/rf_model.json");
        assert_eq!(info.model_path, "models/rf_model.json");
        assert_eq!(info.target, "Water Potability");
    }
}
