//! Pipeline parameters document (`params.yaml`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub data_collection: DataCollectionParams,
    pub model_building: ModelBuildingParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCollectionParams {
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBuildingParams {
    pub n_estimators: usize,
}

impl PipelineParams {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DomainError::configuration(format!(
                "Parameters file {} not found",
                path.display()
            )));
        }

        let params: Self = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                DomainError::configuration(format!(
                    "Error loading parameters from {}: {}",
                    path.display(),
                    e
                ))
            })?;

        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let test_size = self.data_collection.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(DomainError::configuration(format!(
                "data_collection.test_size must be in (0, 1), got {}",
                test_size
            )));
        }

        if self.model_building.n_estimators == 0 {
            return Err(DomainError::configuration(
                "model_building.n_estimators must be at least 1",
            ));
        }

        Ok(())
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            data_collection: DataCollectionParams { test_size: 0.2 },
            model_building: ModelBuildingParams { n_estimators: 100 },
        }
    }
}
