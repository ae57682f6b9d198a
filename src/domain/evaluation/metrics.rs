//! Confusion matrix and the four scalar metrics written by evaluation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::prediction::Potability;

/// Binary confusion matrix with `Potable` as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(
        actual: &[Potability],
        predicted: &[Potability],
    ) -> Result<Self, DomainError> {
        if actual.len() != predicted.len() {
            return Err(DomainError::validation(format!(
                "{} labels but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }

        let mut matrix = Self::default();
        for (a, p) in actual.iter().zip(predicted) {
            match (a, p) {
                (Potability::NotPotable, Potability::NotPotable) => matrix.true_negative += 1,
                (Potability::NotPotable, Potability::Potable) => matrix.false_positive += 1,
                (Potability::Potable, Potability::NotPotable) => matrix.false_negative += 1,
                (Potability::Potable, Potability::Potable) => matrix.true_positive += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Rows are actual classes, columns predicted: `[[tn, fp], [fn, tp]]`
    pub fn as_rows(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

/// Accuracy, precision, recall and F1 for the positive class.
///
/// Undefined ratios (zero denominator) are reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let tp = matrix.true_positive as f64;
        let fp = matrix.false_positive as f64;
        let fn_ = matrix.false_negative as f64;
        let correct = (matrix.true_positive + matrix.true_negative) as f64;

        let accuracy = ratio(correct, matrix.total() as f64);
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = ratio(2.0 * precision * recall, precision + recall);

        Self {
            accuracy,
            precision,
            recall,
            f1,
        }
    }

    pub fn compute(actual: &[Potability], predicted: &[Potability]) -> Result<Self, DomainError> {
        let matrix = ConfusionMatrix::from_predictions(actual, predicted)?;
        Ok(Self::from_confusion(&matrix))
    }

    pub fn to_document(&self) -> MetricsDocument {
        let mut document = MetricsDocument::default();
        document.insert("test_accuracy", self.accuracy);
        document.insert("test_precision", self.precision);
        document.insert("test_recall", self.recall);
        document.insert("test_f1", self.f1);
        document
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Flat metric name to value map, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsDocument(BTreeMap<String, f64>);

impl MetricsDocument {
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
