//! Run a pipeline stage inside an experiment tracker run

use tracing::warn;

use crate::domain::{DomainError, ExperimentTracker, RunStatus, TrackedRun};

/// Open a run, execute `stage`, and close the run as finished or failed.
///
/// A failure to close the run after a failed stage is logged and the stage
/// error is returned.
pub(super) fn with_tracked_run<T>(
    tracker: &dyn ExperimentTracker,
    job_type: &str,
    stage: impl FnOnce(&TrackedRun) -> Result<T, DomainError>,
) -> Result<T, DomainError> {
    let run = tracker.start_run(job_type)?;

    match stage(&run) {
        Ok(value) => {
            tracker.finish_run(&run, RunStatus::Finished)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(finish_error) = tracker.finish_run(&run, RunStatus::Failed) {
                warn!("Could not mark run {} as failed: {}", run.id, finish_error);
            }
            Err(e)
        }
    }
}
