//! JSON file store for the trained model artifact

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::domain::{DomainError, ModelArtifact};
use crate::infrastructure::files::{read_json, StagedWrites};

/// An artifact together with the file it was read from
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub artifact: ModelArtifact,
    pub path: PathBuf,
}

/// Reads the artifact from a primary path with a single fallback, and
/// writes it to the primary path
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    primary: PathBuf,
    fallback: PathBuf,
}

impl ArtifactStore {
    pub fn new(primary: impl Into<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(&config.primary_path, &config.fallback_path)
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    /// The primary path if it exists, otherwise the fallback if that exists
    pub fn locate(&self) -> Option<&Path> {
        if self.primary.exists() {
            Some(&self.primary)
        } else if self.fallback.exists() {
            debug!(
                "No artifact at {}, using fallback {}",
                self.primary.display(),
                self.fallback.display()
            );
            Some(&self.fallback)
        } else {
            None
        }
    }

    /// Load and validate the artifact.
    ///
    /// `NotReady` when neither path exists; `Artifact` when the file cannot
    /// be parsed or fails validation.
    pub fn load(&self) -> Result<LoadedArtifact, DomainError> {
        let path = self.locate().ok_or_else(|| {
            DomainError::not_ready(format!(
                "Model file '{}' not found (fallback '{}' not found either)",
                self.primary.display(),
                self.fallback.display()
            ))
        })?;

        let artifact = Self::read(path)?;
        info!("Model artifact loaded from {}", path.display());

        Ok(LoadedArtifact {
            artifact,
            path: path.to_path_buf(),
        })
    }

    /// Read and validate an artifact from an explicit path
    pub fn read(path: &Path) -> Result<ModelArtifact, DomainError> {
        let artifact: ModelArtifact = read_json(path).map_err(|e| match e {
            DomainError::Dataset { message } => DomainError::artifact(message),
            other => other,
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Persist to the primary path, replacing any previous artifact
    pub fn save(&self, artifact: &ModelArtifact) -> Result<&Path, DomainError> {
        let mut writes = StagedWrites::new();
        let path = self.stage(&mut writes, artifact)?;
        writes.commit()?;
        info!("Model artifact saved to {}", path.display());
        Ok(path)
    }

    /// Stage the artifact for the primary path; it replaces the previous
    /// artifact only when `writes` is committed
    pub fn stage(&self, writes: &mut StagedWrites, artifact: &ModelArtifact) -> Result<&Path, DomainError> {
        writes.stage_json(&self.primary, artifact)?;
        Ok(&self.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureSchema, ForestParams, RandomForest};

    fn artifact() -> ModelArtifact {
        let features = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.2, 0.9], vec![0.8, 0.1]];
        let labels = vec![0, 1, 0, 1];
        let params = ForestParams::new(3);
        let forest = RandomForest::fit(&features, &labels, 2, &params).unwrap();
        ModelArtifact::new(
            FeatureSchema::new(vec!["x".into(), "y".into()], "label"),
            params,
            forest,
            1.0,
            4,
        )
    }

    #[test]
    fn test_missing_artifact_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("models/m.json"), dir.path().join("m.json"));

        assert!(store.locate().is_none());
        assert!(matches!(store.load().unwrap_err(), DomainError::NotReady { .. }));
    }

    #[test]
    fn test_save_then_load_primary() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("models/m.json"), dir.path().join("m.json"));

        store.save(&artifact()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.path, dir.path().join("models/m.json"));
        assert_eq!(loaded.artifact.schema.feature_names, vec!["x", "y"]);
    }

    #[test]
    fn test_fallback_used_only_when_primary_absent() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("models/m.json");
        let fallback = dir.path().join("m.json");

        ArtifactStore::new(&fallback, "unused").save(&artifact()).unwrap();
        let store = ArtifactStore::new(&primary, &fallback);
        assert_eq!(store.load().unwrap().path, fallback);

        store.save(&artifact()).unwrap();
        assert_eq!(store.load().unwrap().path, primary);
    }

    #[test]
    fn test_corrupt_artifact_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("m.json");
        std::fs::write(&primary, b"not json").unwrap();

        let store = ArtifactStore::new(&primary, dir.path().join("other.json"));
        assert!(matches!(store.load().unwrap_err(), DomainError::Artifact { .. }));
    }

    #[test]
    fn test_tampered_schema_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("m.json"), dir.path().join("f.json"));

        let mut tampered = artifact();
        tampered.schema.feature_names.reverse();
        store.save(&tampered).unwrap();

        assert!(matches!(store.load().unwrap_err(), DomainError::Artifact { .. }));
    }
}
