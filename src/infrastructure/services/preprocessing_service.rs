//! Preprocessing stage - median imputation of both raw splits

use std::path::{Path, PathBuf};

use tracing::info;

use super::collection_service::{TEST_FILE, TRAIN_FILE};
use crate::domain::dataset::{impute_median, ImputedColumn};
use crate::domain::DomainError;
use crate::infrastructure::dataset::{read_csv, stage_csv};
use crate::infrastructure::files::StagedWrites;

pub const TRAIN_PROCESSED_FILE: &str = "train_processed.csv";
pub const TEST_PROCESSED_FILE: &str = "test_processed.csv";

/// What was filled in one split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitImputation {
    pub output_path: PathBuf,
    pub rows: usize,
    pub imputed: Vec<ImputedColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessingReport {
    pub train: SplitImputation,
    pub test: SplitImputation,
}

#[derive(Debug, Clone)]
pub struct PreprocessingService {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
}

impl PreprocessingService {
    pub fn new(raw_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    pub fn train_output(&self) -> PathBuf {
        self.processed_dir.join(TRAIN_PROCESSED_FILE)
    }

    pub fn test_output(&self) -> PathBuf {
        self.processed_dir.join(TEST_PROCESSED_FILE)
    }

    /// Impute each split with its own medians. Both splits are read and
    /// imputed before either output is written.
    pub fn preprocess(&self) -> Result<PreprocessingReport, DomainError> {
        let mut train = read_csv(&self.raw_dir.join(TRAIN_FILE))?;
        let mut test = read_csv(&self.raw_dir.join(TEST_FILE))?;

        let train_imputed = impute_median(&mut train)?;
        let test_imputed = impute_median(&mut test)?;

        let train_path = self.train_output();
        let test_path = self.test_output();
        let mut writes = StagedWrites::new();
        stage_csv(&mut writes, &train_path, &train)?;
        stage_csv(&mut writes, &test_path, &test)?;
        writes.commit()?;

        log_imputation(&train_path, &train_imputed);
        log_imputation(&test_path, &test_imputed);
        info!("Data preprocessing completed successfully");

        Ok(PreprocessingReport {
            train: SplitImputation {
                output_path: train_path,
                rows: train.n_rows(),
                imputed: train_imputed,
            },
            test: SplitImputation {
                output_path: test_path,
                rows: test.n_rows(),
                imputed: test_imputed,
            },
        })
    }
}

fn log_imputation(path: &Path, imputed: &[ImputedColumn]) {
    for column in imputed {
        info!(
            "{}: filled {} missing '{}' values with median {}",
            path.display(),
            column.filled,
            column.column,
            column.median
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;
    use crate::infrastructure::dataset::write_csv;
    use crate::infrastructure::services::fixtures;

    fn write_raw(dir: &Path, train: &Dataset, test: &Dataset) {
        write_csv(&dir.join(TRAIN_FILE), train).unwrap();
        write_csv(&dir.join(TEST_FILE), test).unwrap();
    }

    #[test]
    fn test_outputs_have_no_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let data = fixtures::water_dataset(20, true);
        write_raw(&raw, &data, &data.select_rows(&[0, 1, 2, 3, 4, 5]));

        let service = PreprocessingService::new(&raw, dir.path().join("processed"));
        let report = service.preprocess().unwrap();

        let train = read_csv(&report.train.output_path).unwrap();
        let test = read_csv(&report.test.output_path).unwrap();
        for dataset in [&train, &test] {
            assert!((0..dataset.n_columns()).all(|c| dataset.null_count(c) == 0));
        }
        assert_eq!(train.n_rows(), data.n_rows());
        assert_eq!(report.train.imputed.len(), 2);
    }

    #[test]
    fn test_splits_use_their_own_medians() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let columns = vec!["a".to_string(), "Potability".to_string()];
        let train = Dataset::new(
            columns.clone(),
            vec![
                vec![Some(1.0), Some(0.0)],
                vec![Some(3.0), Some(1.0)],
                vec![None, Some(1.0)],
            ],
        )
        .unwrap();
        let test = Dataset::new(
            columns,
            vec![
                vec![Some(10.0), Some(0.0)],
                vec![Some(20.0), Some(1.0)],
                vec![Some(30.0), Some(0.0)],
                vec![None, Some(1.0)],
            ],
        )
        .unwrap();
        write_raw(&raw, &train, &test);

        let report = PreprocessingService::new(&raw, dir.path().join("p"))
            .preprocess()
            .unwrap();

        assert_eq!(report.train.imputed[0].median, 2.0);
        assert_eq!(report.test.imputed[0].median, 20.0);
        let test_out = read_csv(&report.test.output_path).unwrap();
        assert_eq!(test_out.rows()[3][0], Some(20.0));
    }

    #[test]
    fn test_all_missing_column_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let empty_column = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![None, Some(1.0)], vec![None, Some(2.0)]],
        )
        .unwrap();
        write_raw(&raw, &empty_column, &empty_column);

        let service = PreprocessingService::new(&raw, dir.path().join("p"));
        assert!(service.preprocess().is_err());
        assert!(!service.train_output().exists());
    }

    #[test]
    fn test_blocked_test_output_leaves_no_train_output() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let data = fixtures::water_dataset(12, true);
        write_raw(&raw, &data, &data);

        let service = PreprocessingService::new(&raw, dir.path().join("processed"));
        std::fs::create_dir_all(service.test_output().join("blocker")).unwrap();

        let err = service.preprocess().unwrap_err();
        assert!(matches!(err, DomainError::Io { .. }));
        assert!(!service.train_output().exists());
    }

    #[test]
    fn test_failed_rerun_keeps_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let data = fixtures::water_dataset(12, true);
        write_raw(&raw, &data, &data);

        let service = PreprocessingService::new(&raw, dir.path().join("processed"));
        service.preprocess().unwrap();
        let previous = std::fs::read(service.train_output()).unwrap();

        std::fs::remove_file(service.test_output()).unwrap();
        std::fs::create_dir_all(service.test_output().join("blocker")).unwrap();
        write_raw(&raw, &fixtures::water_dataset(30, true), &data);

        assert!(service.preprocess().is_err());
        assert_eq!(std::fs::read(service.train_output()).unwrap(), previous);
    }

    #[test]
    fn test_missing_raw_split_fails() {
        let dir = tempfile::tempdir().unwrap();
        let service = PreprocessingService::new(dir.path(), dir.path().join("p"));
        assert!(matches!(service.preprocess().unwrap_err(), DomainError::Io { .. }));
    }
}
