//! Experiment tracker trait

use std::collections::BTreeMap;
use std::path::Path;

use super::{RunStatus, TrackedRun};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Records configuration, scalar metrics and artifacts of pipeline runs
#[cfg_attr(test, automock)]
pub trait ExperimentTracker: Send + Sync {
    /// Opens a run for one job (e.g. "train", "evaluate")
    fn start_run(&self, job_type: &str) -> Result<TrackedRun, DomainError>;

    fn log_config(&self, run: &TrackedRun, config: &serde_json::Value) -> Result<(), DomainError>;

    fn log_metrics(
        &self,
        run: &TrackedRun,
        metrics: &BTreeMap<String, f64>,
    ) -> Result<(), DomainError>;

    /// Records a file produced by the run
    fn log_artifact(
        &self,
        run: &TrackedRun,
        name: &str,
        kind: &str,
        path: &Path,
    ) -> Result<(), DomainError>;

    fn finish_run(&self, run: &TrackedRun, status: RunStatus) -> Result<(), DomainError>;
}
