//! Report stage - the numbers behind the dataset and evaluation figures

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::evaluation_service::score_split;
use crate::domain::dataset::{correlation_matrix, describe, ColumnSummary};
use crate::domain::{ConfusionMatrix, DomainError, MetricsDocument, ModelArtifact, LABEL_COLUMN};
use crate::infrastructure::dataset::read_csv;
use crate::infrastructure::files::{read_json, write_json};

pub const SUMMARY_FILE: &str = "summary.json";

const CLASS_LABELS: [&str; 2] = ["Not Potable", "Potable"];

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub columns: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfusionReport {
    pub labels: [&'static str; 2],
    /// `[[tn, fp], [fn, tp]]`, rows are actual classes
    pub matrix: [[usize; 2]; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Per-class mean of every feature column
#[derive(Debug, Clone, Serialize)]
pub struct ClassProfile {
    pub label: &'static str,
    pub count: usize,
    pub means: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub source: String,
    pub n_rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub correlation: CorrelationReport,
    pub class_profiles: Vec<ClassProfile>,
    pub confusion_matrix: ConfusionReport,
    /// Sorted by decreasing importance
    pub feature_importances: Vec<FeatureImportance>,
    pub metrics: MetricsDocument,
}

#[derive(Debug, Clone)]
pub struct ReportService {
    reports_dir: PathBuf,
}

impl ReportService {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.reports_dir.join(SUMMARY_FILE)
    }

    pub fn report(
        &self,
        artifact: &ModelArtifact,
        test_path: &Path,
        metrics_path: &Path,
    ) -> Result<ReportSummary, DomainError> {
        let dataset = read_csv(test_path)?;
        let label_index = dataset.column_index(LABEL_COLUMN).ok_or_else(|| {
            DomainError::validation(format!(
                "The dataset must contain a '{}' column for evaluation visualization",
                LABEL_COLUMN
            ))
        })?;

        let metrics: MetricsDocument = read_json(metrics_path).map_err(|e| {
            DomainError::io(format!("Error loading {}: {}", metrics_path.display(), e))
        })?;

        let scored = score_split(artifact, test_path)?;
        let confusion = ConfusionMatrix::from_predictions(&scored.actual, &scored.predicted)?;

        let mut feature_importances: Vec<FeatureImportance> = artifact
            .schema
            .feature_names
            .iter()
            .zip(artifact.forest.feature_importances())
            .map(|(feature, importance)| FeatureImportance {
                feature: feature.clone(),
                importance,
            })
            .collect();
        feature_importances.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        let summary = ReportSummary {
            source: test_path.display().to_string(),
            n_rows: dataset.n_rows(),
            columns: describe(&dataset),
            correlation: CorrelationReport {
                columns: dataset.columns().to_vec(),
                matrix: correlation_matrix(&dataset),
            },
            class_profiles: class_profiles(&dataset, label_index),
            confusion_matrix: ConfusionReport {
                labels: CLASS_LABELS,
                matrix: confusion.as_rows(),
            },
            feature_importances,
            metrics,
        };

        let path = self.summary_path();
        write_json(&path, &summary)?;
        info!("Report written to {}", path.display());

        Ok(summary)
    }
}

fn class_profiles(dataset: &crate::domain::Dataset, label_index: usize) -> Vec<ClassProfile> {
    CLASS_LABELS
        .iter()
        .enumerate()
        .map(|(class, label)| {
            let rows: Vec<&Vec<Option<f64>>> = dataset
                .rows()
                .iter()
                .filter(|row| row[label_index] == Some(class as f64))
                .collect();

            let means = dataset
                .columns()
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != label_index)
                .filter_map(|(index, column)| {
                    let values: Vec<f64> = rows.iter().filter_map(|row| row[index]).collect();
                    if values.is_empty() {
                        None
                    } else {
                        Some((column.clone(), values.iter().sum::<f64>() / values.len() as f64))
                    }
                })
                .collect();

            ClassProfile {
                label: *label,
                count: rows.len(),
                means,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::dataset::write_csv;
    use crate::infrastructure::services::fixtures;

    fn setup(dir: &Path) -> (PathBuf, PathBuf) {
        let test_path = dir.join("test_processed.csv");
        write_csv(&test_path, &fixtures::water_dataset(6, false)).unwrap();

        let metrics_path = dir.join("eval_metrics.json");
        let mut metrics = MetricsDocument::default();
        metrics.insert("test_accuracy", 1.0);
        write_json(&metrics_path, &metrics).unwrap();

        (test_path, metrics_path)
    }

    #[test]
    fn test_report_summary_contents() {
        let dir = tempfile::tempdir().unwrap();
        let (test_path, metrics_path) = setup(dir.path());

        let service = ReportService::new(dir.path().join("reports"));
        let summary = service
            .report(&fixtures::water_artifact(), &test_path, &metrics_path)
            .unwrap();

        assert_eq!(summary.n_rows, 12);
        assert_eq!(summary.columns.len(), 10);
        assert_eq!(summary.correlation.matrix.len(), 10);
        assert_eq!(summary.confusion_matrix.matrix, [[6, 0], [0, 6]]);
        assert_eq!(summary.class_profiles[1].count, 6);
        assert_eq!(summary.metrics.get("test_accuracy"), Some(1.0));

        let total: f64 = summary.feature_importances.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(summary
            .feature_importances
            .windows(2)
            .all(|w| w[0].importance >= w[1].importance));

        let written: serde_json::Value = read_json(&service.summary_path()).unwrap();
        assert_eq!(written["confusion_matrix"]["labels"][1], "Potable");
        assert!(written["columns"][0].get("25%").is_some());
    }

    #[test]
    fn test_missing_metrics_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (test_path, _) = setup(dir.path());

        let service = ReportService::new(dir.path().join("reports"));
        let result = service.report(
            &fixtures::water_artifact(),
            &test_path,
            &dir.path().join("absent.json"),
        );
        assert!(result.is_err());
        assert!(!service.summary_path().exists());
    }
}
