//! Tracked run entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single tracked run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A run opened by a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRun {
    pub id: RunId,
    pub project: String,
    pub job_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Finished,
    Failed,
}

/// One line of a run log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackingEvent {
    RunStarted {
        run_id: RunId,
        project: String,
        job_type: String,
        at: DateTime<Utc>,
    },
    Config {
        run_id: RunId,
        config: serde_json::Value,
        at: DateTime<Utc>,
    },
    Metric {
        run_id: RunId,
        name: String,
        value: f64,
        at: DateTime<Utc>,
    },
    Artifact {
        run_id: RunId,
        name: String,
        kind: String,
        path: String,
        at: DateTime<Utc>,
    },
    RunFinished {
        run_id: RunId,
        status: RunStatus,
        at: DateTime<Utc>,
    },
}

impl TrackingEvent {
    pub fn run_id(&self) -> &RunId {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::Config { run_id, .. }
            | Self::Metric { run_id, .. }
            | Self::Artifact { run_id, .. }
            | Self::RunFinished { run_id, .. } => run_id,
        }
    }
}
