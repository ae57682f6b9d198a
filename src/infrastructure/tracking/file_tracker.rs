//! Experiment tracker writing one JSON-lines log per run

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::domain::{
    DomainError, ExperimentTracker, RunId, RunStatus, TrackedRun, TrackingEvent,
};

/// Appends [`TrackingEvent`]s to `<dir>/<project>/<job_type>-<run_id>.jsonl`
#[derive(Debug, Clone)]
pub struct FileExperimentTracker {
    project: String,
    project_dir: PathBuf,
}

impl FileExperimentTracker {
    pub fn new(dir: impl AsRef<Path>, project: impl Into<String>) -> Self {
        let project = project.into();
        let project_dir = dir.as_ref().join(&project);
        Self {
            project,
            project_dir,
        }
    }

    pub fn run_log_path(&self, run: &TrackedRun) -> PathBuf {
        self.project_dir
            .join(format!("{}-{}.jsonl", run.job_type, run.id))
    }

    fn append(&self, run: &TrackedRun, event: &TrackingEvent) -> Result<(), DomainError> {
        let path = self.run_log_path(run);
        let mut line = serde_json::to_string(event)
            .map_err(|e| DomainError::internal(format!("Cannot serialize tracking event: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DomainError::io(format!("Cannot open run log {}: {}", path.display(), e)))?;

        file.write_all(line.as_bytes())
            .map_err(|e| DomainError::io(format!("Cannot write run log {}: {}", path.display(), e)))
    }

    /// Read back every event of a run, oldest first
    pub fn read_events(&self, run: &TrackedRun) -> Result<Vec<TrackingEvent>, DomainError> {
        let path = self.run_log_path(run);
        let contents = fs::read_to_string(&path)
            .map_err(|e| DomainError::io(format!("Cannot read run log {}: {}", path.display(), e)))?;

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    DomainError::dataset(format!("Corrupt run log {}: {}", path.display(), e))
                })
            })
            .collect()
    }
}

impl ExperimentTracker for FileExperimentTracker {
    fn start_run(&self, job_type: &str) -> Result<TrackedRun, DomainError> {
        fs::create_dir_all(&self.project_dir).map_err(|e| {
            DomainError::io(format!(
                "Cannot create tracking directory {}: {}",
                self.project_dir.display(),
                e
            ))
        })?;

        let run = TrackedRun {
            id: RunId::generate(),
            project: self.project.clone(),
            job_type: job_type.to_string(),
        };

        self.append(
            &run,
            &TrackingEvent::RunStarted {
                run_id: run.id.clone(),
                project: run.project.clone(),
                job_type: run.job_type.clone(),
                at: Utc::now(),
            },
        )?;

        debug!("Tracking run {} at {}", run.id, self.run_log_path(&run).display());
        Ok(run)
    }

    fn log_config(&self, run: &TrackedRun, config: &serde_json::Value) -> Result<(), DomainError> {
        self.append(
            run,
            &TrackingEvent::Config {
                run_id: run.id.clone(),
                config: config.clone(),
                at: Utc::now(),
            },
        )
    }

    fn log_metrics(
        &self,
        run: &TrackedRun,
        metrics: &BTreeMap<String, f64>,
    ) -> Result<(), DomainError> {
        let at = Utc::now();
        for (name, value) in metrics {
            self.append(
                run,
                &TrackingEvent::Metric {
                    run_id: run.id.clone(),
                    name: name.clone(),
                    value: *value,
                    at,
                },
            )?;
        }
        Ok(())
    }

    fn log_artifact(
        &self,
        run: &TrackedRun,
        name: &str,
        kind: &str,
        path: &Path,
    ) -> Result<(), DomainError> {
        self.append(
            run,
            &TrackingEvent::Artifact {
                run_id: run.id.clone(),
                name: name.to_string(),
                kind: kind.to_string(),
                path: path.display().to_string(),
                at: Utc::now(),
            },
        )
    }

    fn finish_run(&self, run: &TrackedRun, status: RunStatus) -> Result<(), DomainError> {
        self.append(
            run,
            &TrackingEvent::RunFinished {
                run_id: run.id.clone(),
                status,
                at: Utc::now(),
            },
        )
    }
}
