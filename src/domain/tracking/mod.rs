//! Experiment tracking domain

mod entity;
mod tracker;

pub use entity::{RunId, RunStatus, TrackedRun, TrackingEvent};
#[cfg(test)]
pub use tracker::MockExperimentTracker;
pub use tracker::ExperimentTracker;
