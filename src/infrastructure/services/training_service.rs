//! Training stage - fit the Random Forest and persist the artifact

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::tracked::with_tracked_run;
use crate::domain::{
    DomainError, ExperimentTracker, FeatureSchema, ForestParams, LabeledData, ModelArtifact,
    RandomForest, FEATURE_NAMES, LABEL_COLUMN,
};
use crate::infrastructure::artifact::ArtifactStore;
use crate::infrastructure::dataset::read_csv;
use crate::infrastructure::files::StagedWrites;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub artifact_path: PathBuf,
    pub training_accuracy: f64,
    pub n_samples: usize,
    pub n_features: usize,
}

pub struct TrainingService {
    store: ArtifactStore,
    tracker: Arc<dyn ExperimentTracker>,
}

impl TrainingService {
    pub fn new(store: ArtifactStore, tracker: Arc<dyn ExperimentTracker>) -> Self {
        Self { store, tracker }
    }

    /// Fit on the processed training split and save the artifact to the
    /// store's primary path
    pub fn train(&self, train_path: &Path, params: &ForestParams) -> Result<TrainingReport, DomainError> {
        with_tracked_run(self.tracker.as_ref(), "train", |run| {
            let config = serde_json::to_value(params)
                .map_err(|e| DomainError::internal(format!("Cannot serialize params: {}", e)))?;
            self.tracker.log_config(run, &config)?;

            if !train_path.exists() {
                return Err(DomainError::io(format!(
                    "{} not found. Please run data collection/preprocessing first.",
                    train_path.display()
                )));
            }

            let dataset = read_csv(train_path)?;
            if dataset.column_index(LABEL_COLUMN).is_none() {
                return Err(DomainError::validation(format!(
                    "Training data {} has no '{}' column",
                    train_path.display(),
                    LABEL_COLUMN
                )));
            }

            let labeled = dataset.split_label(LABEL_COLUMN)?;
            if labeled.feature_names != FEATURE_NAMES {
                warn!(
                    "Training features [{}] differ from the prediction schema; the API will not serve this model",
                    labeled.feature_names.join(", ")
                );
            }

            info!(
                "Training model on {} samples with {} trees",
                labeled.features.len(),
                params.n_estimators
            );
            let (artifact, accuracy) = fit(labeled, params)?;
            info!("Training Accuracy: {}", accuracy);

            self.tracker.log_metrics(
                run,
                &BTreeMap::from([("train_accuracy".to_string(), accuracy)]),
            )?;

            let mut writes = StagedWrites::new();
            let path = self.store.stage(&mut writes, &artifact)?.to_path_buf();
            self.tracker.log_artifact(run, "rf_model", "model", &path)?;
            writes.commit()?;
            info!("Model artifact saved to {}", path.display());

            Ok(TrainingReport {
                artifact_path: path,
                training_accuracy: accuracy,
                n_samples: artifact.n_training_samples,
                n_features: artifact.schema.feature_names.len(),
            })
        })
    }
}

fn fit(labeled: LabeledData, params: &ForestParams) -> Result<(ModelArtifact, f64), DomainError> {
    let labels: Vec<usize> = labeled
        .labels
        .iter()
        .map(|l| l.as_label() as usize)
        .collect();

    let forest = RandomForest::fit(&labeled.features, &labels, 2, params)?;

    let predictions = forest.predict_batch(&labeled.features)?;
    let correct = predictions
        .iter()
        .zip(&labels)
        .filter(|(p, l)| p == l)
        .count();
    let accuracy = correct as f64 / labels.len() as f64;

    let artifact = ModelArtifact::new(
        FeatureSchema::new(labeled.feature_names, LABEL_COLUMN),
        params.clone(),
        forest,
        accuracy,
        labels.len(),
    );

    Ok((artifact, accuracy))
}
