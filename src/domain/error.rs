use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Model not loaded: {message}")]
    NotReady { message: String },

    #[error("Prediction failed: {message}")]
    Inference { message: String },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Dataset error: {message}")]
    Dataset { message: String },

    #[error("Artifact error: {message}")]
    Artifact { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    pub fn artifact(message: impl Into<String>) -> Self {
        Self::Artifact {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used as a metric label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "not_ready",
            Self::Inference { .. } => "inference",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::Validation { .. } => "validation",
            Self::Dataset { .. } => "dataset",
            Self::Artifact { .. } => "artifact",
            Self::Io { .. } => "io",
            Self::Configuration { .. } => "configuration",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
