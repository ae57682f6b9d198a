//! Evaluation stage - score the artifact on the held-out split

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use super::tracked::with_tracked_run;
use crate::domain::{
    ClassificationMetrics, ConfusionMatrix, DomainError, ExperimentTracker, MetricsDocument,
    ModelArtifact, Potability, LABEL_COLUMN,
};
use crate::infrastructure::dataset::read_csv;
use crate::infrastructure::files::write_json;

pub const METRICS_FILE: &str = "eval_metrics.json";

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub metrics: ClassificationMetrics,
    pub confusion: ConfusionMatrix,
    pub metrics_path: PathBuf,
}

/// Predictions and true labels of a test split
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSplit {
    pub actual: Vec<Potability>,
    pub predicted: Vec<Potability>,
}

pub struct EvaluationService {
    tracker: Arc<dyn ExperimentTracker>,
}

impl EvaluationService {
    pub fn new(tracker: Arc<dyn ExperimentTracker>) -> Self {
        Self { tracker }
    }

    /// Compute the four metrics and write them as a flat JSON document
    pub fn evaluate(
        &self,
        artifact: &ModelArtifact,
        test_path: &Path,
        metrics_path: &Path,
    ) -> Result<EvaluationOutcome, DomainError> {
        with_tracked_run(self.tracker.as_ref(), "evaluate", |run| {
            info!("Evaluating model on {}", test_path.display());
            let scored = score_split(artifact, test_path)?;

            let confusion = ConfusionMatrix::from_predictions(&scored.actual, &scored.predicted)?;
            let metrics = ClassificationMetrics::from_confusion(&confusion);
            let document = metrics.to_document();
            info!(
                "Metrics: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
                metrics.accuracy, metrics.precision, metrics.recall, metrics.f1
            );

            self.tracker.log_metrics(run, &to_map(&document))?;
            write_json(metrics_path, &document)?;
            info!("Evaluation completed, metrics written to {}", metrics_path.display());

            Ok(EvaluationOutcome {
                metrics,
                confusion,
                metrics_path: metrics_path.to_path_buf(),
            })
        })
    }
}

/// Predict every row of a processed test split.
///
/// The split's feature columns must be exactly the artifact's schema, in order.
pub fn score_split(artifact: &ModelArtifact, test_path: &Path) -> Result<ScoredSplit, DomainError> {
    if !test_path.exists() {
        return Err(DomainError::io(format!("{} not found.", test_path.display())));
    }

    let dataset = read_csv(test_path)?;
    if dataset.column_index(LABEL_COLUMN).is_none() {
        return Err(DomainError::validation(format!(
            "The dataset must contain a '{}' column for evaluation",
            LABEL_COLUMN
        )));
    }

    let labeled = dataset.split_label(LABEL_COLUMN)?;
    if labeled.feature_names != artifact.schema.feature_names {
        return Err(DomainError::validation(format!(
            "Test features [{}] do not match the model schema [{}]",
            labeled.feature_names.join(", "),
            artifact.schema.feature_names.join(", ")
        )));
    }

    let predicted = artifact
        .forest
        .predict_batch(&labeled.features)?
        .into_iter()
        .map(|class| {
            u8::try_from(class)
                .map_err(|_| DomainError::inference(format!("Unknown class {}", class)))
                .and_then(Potability::from_label)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScoredSplit {
        actual: labeled.labels,
        predicted,
    })
}

fn to_map(document: &MetricsDocument) -> std::collections::BTreeMap<String, f64> {
    document
        .iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracking::MockExperimentTracker;
    use crate::domain::{Dataset, RunId, TrackedRun};
    use crate::infrastructure::dataset::write_csv;
    use crate::infrastructure::files::read_json;
    use crate::infrastructure::services::fixtures;
    use crate::infrastructure::tracking::NoopExperimentTracker;

    #[test]
    fn test_evaluate_writes_flat_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let test_path = dir.path().join("test_processed.csv");
        write_csv(&test_path, &fixtures::water_dataset(8, false)).unwrap();
        let metrics_path = dir.path().join("reports").join(METRICS_FILE);

        let service = EvaluationService::new(Arc::new(NoopExperimentTracker));
        let outcome = service
            .evaluate(&fixtures::water_artifact(), &test_path, &metrics_path)
            .unwrap();

        assert_eq!(outcome.metrics.accuracy, 1.0);
        assert_eq!(outcome.confusion.as_rows(), [[8, 0], [0, 8]]);

        let document: serde_json::Value = read_json(&metrics_path).unwrap();
        let keys: Vec<&String> = document.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["test_accuracy", "test_f1", "test_precision", "test_recall"]);
        assert_eq!(document["test_recall"], 1.0);
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let test_path = dir.path().join("test_processed.csv");
        let other = Dataset::new(
            vec!["a".to_string(), "Potability".to_string()],
            vec![vec![Some(1.0), Some(0.0)]],
        )
        .unwrap();
        write_csv(&test_path, &other).unwrap();

        let err = score_split(&fixtures::water_artifact(), &test_path).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_metrics_logged_to_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let test_path = dir.path().join("test_processed.csv");
        write_csv(&test_path, &fixtures::water_dataset(4, false)).unwrap();

        let mut tracker = MockExperimentTracker::new();
        tracker.expect_start_run().withf(|job| job == "evaluate").returning(|job| {
            Ok(TrackedRun {
                id: RunId::generate(),
                project: "p".to_string(),
                job_type: job.to_string(),
            })
        });
        tracker
            .expect_log_metrics()
            .withf(|_, metrics| metrics.len() == 4 && metrics.contains_key("test_f1"))
            .times(1)
            .returning(|_, _| Ok(()));
        tracker.expect_finish_run().times(1).returning(|_, _| Ok(()));

        EvaluationService::new(Arc::new(tracker))
            .evaluate(
                &fixtures::water_artifact(),
                &test_path,
                &dir.path().join(METRICS_FILE),
            )
            .unwrap();
    }
}
