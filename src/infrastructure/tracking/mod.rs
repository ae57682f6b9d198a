//! Experiment tracker implementations

mod file_tracker;
mod noop;

use std::sync::Arc;

pub use file_tracker::FileExperimentTracker;
pub use noop::NoopExperimentTracker;

use crate::config::TrackingConfig;
use crate::domain::ExperimentTracker;

/// Build the tracker selected by configuration
pub fn create_tracker(config: &TrackingConfig) -> Arc<dyn ExperimentTracker> {
    if config.enabled {
        Arc::new(FileExperimentTracker::new(&config.dir, &config.project))
    } else {
        Arc::new(NoopExperimentTracker)
    }
}
