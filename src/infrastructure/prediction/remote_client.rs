//! HTTP client for a remote prediction API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{DomainError, PredictionProvider, PredictionResult, ProviderHealth, WaterSample};

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(10);

/// Calls `POST /predict` and `GET /health` on a prediction API.
///
/// Every call is a single attempt; transport failures and timeouts surface
/// as `UpstreamUnavailable`.
#[derive(Debug, Clone)]
pub struct RemotePredictionClient {
    client: Client,
    base_url: String,
    health_timeout: Duration,
    predict_timeout: Duration,
}

/// Error bodies the API may return: our JSON error envelope, or a bare detail
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Envelope { error: ErrorMessage },
    Detail { detail: String },
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl ErrorBody {
    fn into_message(self) -> String {
        match self {
            Self::Envelope { error } => error.message,
            Self::Detail { detail } => detail,
        }
    }
}

impl RemotePredictionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, HEALTH_TIMEOUT, PREDICT_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        health_timeout: Duration,
        predict_timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            health_timeout,
            predict_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn error_from_status(status: StatusCode, body: &str) -> DomainError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(ErrorBody::into_message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        });

    match status {
        StatusCode::SERVICE_UNAVAILABLE => DomainError::not_ready(message),
        StatusCode::INTERNAL_SERVER_ERROR => DomainError::inference(message),
        s if s.is_client_error() => DomainError::validation(message),
        _ => DomainError::upstream(format!("HTTP {}: {}", status, message)),
    }
}

#[async_trait]
impl PredictionProvider for RemotePredictionClient {
    async fn predict(&self, sample: &WaterSample) -> Result<PredictionResult, DomainError> {
        let url = self.url("/predict");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.predict_timeout)
            .json(sample)
            .send()
            .await
            .map_err(|e| {
                warn!("Prediction request to {} failed: {}", url, e);
                DomainError::upstream(format!("Could not reach prediction API at {}: {}", self.base_url, e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::upstream(format!("Error reading prediction response: {}", e)))?;

        if !status.is_success() {
            return Err(error_from_status(status, &body));
        }

        let result: PredictionResult = serde_json::from_str(&body).map_err(|e| {
            DomainError::upstream(format!("Invalid prediction response: {}", e))
        })?;

        // reject labels outside {0, 1}
        result.potability().map_err(|e| DomainError::upstream(e.to_string()))?;
        Ok(result)
    }

    async fn health(&self) -> ProviderHealth {
        let result = self
            .client
            .get(self.url("/health"))
            .timeout(self.health_timeout)
            .send()
            .await;

        let ready = match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check against {} failed: {}", self.base_url, e);
                false
            }
        };

        ProviderHealth { ready }
    }

    fn describe(&self) -> String {
        format!("remote API at {}", self.base_url)
    }
}
