//! Data collection stage - fetch the source CSV and split it

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::domain::dataset::{train_test_split, DEFAULT_SEED};
use crate::domain::DomainError;
use crate::infrastructure::dataset::{fetch_dataset, stage_csv, DatasetSource};
use crate::infrastructure::files::StagedWrites;

pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Downloads the dataset and writes the raw train/test splits
#[derive(Debug, Clone)]
pub struct CollectionService {
    raw_dir: PathBuf,
    download_timeout: Duration,
}

impl CollectionService {
    pub fn new(raw_dir: impl Into<PathBuf>, download_timeout: Duration) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            download_timeout,
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub async fn collect(
        &self,
        source: &DatasetSource,
        test_size: f64,
    ) -> Result<CollectionReport, DomainError> {
        let data = fetch_dataset(source, self.download_timeout).await?;
        info!(
            "Fetched {} rows x {} columns",
            data.n_rows(),
            data.n_columns()
        );

        let (train, test) = train_test_split(&data, test_size, DEFAULT_SEED)?;

        let train_path = self.raw_dir.join(TRAIN_FILE);
        let test_path = self.raw_dir.join(TEST_FILE);
        let mut writes = StagedWrites::new();
        stage_csv(&mut writes, &train_path, &train)?;
        stage_csv(&mut writes, &test_path, &test)?;
        writes.commit()?;

        info!(
            "Data collection stage completed: {} train rows, {} test rows",
            train.n_rows(),
            test.n_rows()
        );

        Ok(CollectionReport {
            train_path,
            test_path,
            train_rows: train.n_rows(),
            test_rows: test.n_rows(),
        })
    }
}
