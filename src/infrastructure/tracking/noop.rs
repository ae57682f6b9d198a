use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{DomainError, ExperimentTracker, RunId, RunStatus, TrackedRun};

/// Tracker used when tracking is disabled; records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExperimentTracker;

impl ExperimentTracker for NoopExperimentTracker {
    fn start_run(&self, job_type: &str) -> Result<TrackedRun, DomainError> {
        Ok(TrackedRun {
            id: RunId::generate(),
            project: String::new(),
            job_type: job_type.to_string(),
        })
    }

    fn log_config(&self, _run: &TrackedRun, _config: &serde_json::Value) -> Result<(), DomainError> {
        Ok(())
    }

    fn log_metrics(
        &self,
        _run: &TrackedRun,
        _metrics: &BTreeMap<String, f64>,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    fn log_artifact(
        &self,
        _run: &TrackedRun,
        _name: &str,
        _kind: &str,
        _path: &Path,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    fn finish_run(&self, _run: &TrackedRun, _status: RunStatus) -> Result<(), DomainError> {
        Ok(())
    }
}
