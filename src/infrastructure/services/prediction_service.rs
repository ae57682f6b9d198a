//! Prediction service - serves the loaded model

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::{
    DomainError, FeatureSchema, ModelArtifact, ModelInfo, Potability, PredictionProvider,
    PredictionResult, ProviderHealth, WaterSample,
};
use crate::infrastructure::artifact::ArtifactStore;
use crate::infrastructure::observability::{record_prediction, set_model_loaded, PredictionOutcome};

#[derive(Debug)]
struct LoadedModel {
    artifact: ModelArtifact,
    info: ModelInfo,
}

/// Holds the artifact loaded at startup, if any.
///
/// The artifact is never replaced after construction; without one the
/// service is degraded and every prediction fails with `NotReady`.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: Option<Arc<LoadedModel>>,
}

impl PredictionService {
    /// Load from the store; any failure leaves the service degraded
    pub fn load(store: &ArtifactStore) -> Self {
        let service = match store.load() {
            Ok(loaded) => {
                let path = loaded.path.display().to_string();
                match Self::with_artifact(loaded.artifact, &path) {
                    Ok(service) => service,
                    Err(e) => {
                        error!("Error loading model from {}: {}", path, e);
                        Self::unloaded()
                    }
                }
            }
            Err(e) => {
                error!("Error loading model: {}", e);
                Self::unloaded()
            }
        };

        if service.is_loaded() {
            info!("Model loaded and ready for predictions");
        } else {
            warn!("Failed to load model on startup; predictions will return 503");
        }
        set_model_loaded(service.is_loaded());

        service
    }

    pub fn unloaded() -> Self {
        Self { model: None }
    }

    /// Wrap an artifact, rejecting it unless its schema is exactly the
    /// water sample feature order
    pub fn with_artifact(
        artifact: ModelArtifact,
        model_path: impl Into<String>,
    ) -> Result<Self, DomainError> {
        artifact.validate()?;
        FeatureSchema::water_sample().ensure_matches(&artifact.schema)?;

        let info = artifact.info(model_path);
        Ok(Self {
            model: Some(Arc::new(LoadedModel { artifact, info })),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model.as_ref().map(|m| &m.info)
    }

    pub fn artifact(&self) -> Option<&ModelArtifact> {
        self.model.as_ref().map(|m| &m.artifact)
    }

    /// Classify one sample with the loaded forest
    pub fn classify(&self, sample: &WaterSample) -> Result<PredictionResult, DomainError> {
        let started = Instant::now();
        let result = self.run_model(sample);

        let outcome = match &result {
            Ok(r) => PredictionOutcome::Label(r.prediction),
            Err(e) => PredictionOutcome::Failed(e.kind()),
        };
        record_prediction(outcome, started.elapsed());

        if let Err(e) = &result {
            error!("Prediction error: {}", e);
        }
        result
    }

    fn run_model(&self, sample: &WaterSample) -> Result<PredictionResult, DomainError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| DomainError::not_ready("Model not loaded"))?;

        let class = model.artifact.forest.predict(&sample.to_features())?;
        let label = u8::try_from(class)
            .map_err(|_| DomainError::inference(format!("Model produced unknown class {}", class)))?;
        let potability = Potability::from_label(label)
            .map_err(|e| DomainError::inference(e.to_string()))?;

        Ok(PredictionResult::from(potability))
    }

    pub fn readiness(&self) -> ProviderHealth {
        ProviderHealth {
            ready: self.is_loaded(),
        }
    }
}

#[async_trait]
impl PredictionProvider for PredictionService {
    async fn predict(&self, sample: &WaterSample) -> Result<PredictionResult, DomainError> {
        self.classify(sample)
    }

    async fn health(&self) -> ProviderHealth {
        self.readiness()
    }

    fn describe(&self) -> String {
        match self.model_info() {
            Some(info) => format!("in-process model from {}", info.model_path),
            None => "in-process model (not loaded)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::services::fixtures;

    #[test]
    fn test_unloaded_service_is_not_ready() {
        let service = PredictionService::unloaded();

        assert!(!service.readiness().ready);
        assert!(service.model_info().is_none());
        let err = service.classify(&fixtures::clean_sample()).unwrap_err();
        assert!(matches!(err, DomainError::NotReady { .. }));
    }

    #[test]
    fn test_loaded_service_predicts_binary_label() {
        let service =
            PredictionService::with_artifact(fixtures::water_artifact(), "models/rf_model.json")
                .unwrap();

        assert!(service.readiness().ready);
        let result = service.classify(&fixtures::clean_sample()).unwrap();
        assert!(result.prediction <= 1);
        assert_eq!(result.result, result.potability().unwrap().verdict());
        assert_eq!(service.model_info().unwrap().model_path, "models/rf_model.json");
    }

    #[test]
    fn test_prediction_follows_training_pattern() {
        let service =
            PredictionService::with_artifact(fixtures::water_artifact(), "m.json").unwrap();

        assert_eq!(service.classify(&fixtures::clean_sample()).unwrap().prediction, 1);
        assert_eq!(service.classify(&fixtures::dirty_sample()).unwrap().prediction, 0);
    }

    #[test]
    fn test_repeated_classification_is_identical() {
        let service =
            PredictionService::with_artifact(fixtures::water_artifact(), "m.json").unwrap();

        for sample in [fixtures::clean_sample(), fixtures::dirty_sample()] {
            let first = service.classify(&sample).unwrap();
            for _ in 0..20 {
                assert_eq!(service.classify(&sample).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_rejects_artifact_with_other_feature_order() {
        let mut artifact = fixtures::water_artifact();
        let mut names = artifact.schema.feature_names.clone();
        names.swap(0, 1);
        artifact.schema = FeatureSchema::new(names, "Potability");

        let err = PredictionService::with_artifact(artifact, "m.json").unwrap_err();
        assert!(matches!(err, DomainError::Artifact { .. }));
    }

    #[test]
    fn test_load_missing_artifact_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("a.json"), dir.path().join("b.json"));

        let service = PredictionService::load(&store);
        assert!(!service.is_loaded());
    }

    #[test]
    fn test_load_from_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("rf_model.json");
        ArtifactStore::new(&fallback, "unused")
            .save(&fixtures::water_artifact())
            .unwrap();

        let store = ArtifactStore::new(dir.path().join("models/rf_model.json"), &fallback);
        let service = PredictionService::load(&store);

        assert!(service.is_loaded());
        assert_eq!(
            service.model_info().unwrap().model_path,
            fallback.display().to_string()
        );
    }

    #[test]
    fn test_load_non_water_artifact_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        let store = ArtifactStore::new(&path, dir.path().join("f.json"));
        store.save(&fixtures::two_feature_artifact()).unwrap();

        assert!(!PredictionService::load(&store).is_loaded());
    }

    #[tokio::test]
    async fn test_provider_interface() {
        let service =
            PredictionService::with_artifact(fixtures::water_artifact(), "m.json").unwrap();
        let provider: &dyn PredictionProvider = &service;

        assert!(provider.health().await.ready);
        assert!(provider.predict(&fixtures::clean_sample()).await.is_ok());
        assert!(provider.describe().contains("m.json"));
    }
}
