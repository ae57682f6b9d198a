//! Infrastructure services

mod collection_service;
mod evaluation_service;
mod prediction_service;
mod preprocessing_service;
mod report_service;
mod tracked;
mod training_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use collection_service::{CollectionReport, CollectionService, TEST_FILE, TRAIN_FILE};
pub use evaluation_service::{
    score_split, EvaluationOutcome, EvaluationService, ScoredSplit, METRICS_FILE,
};
pub use prediction_service::PredictionService;
pub use preprocessing_service::{
    PreprocessingReport, PreprocessingService, SplitImputation, TEST_PROCESSED_FILE,
    TRAIN_PROCESSED_FILE,
};
pub use report_service::{
    ClassProfile, ConfusionReport, CorrelationReport, FeatureImportance, ReportService,
    ReportSummary, SUMMARY_FILE,
};
pub use training_service::{TrainingReport, TrainingService};
