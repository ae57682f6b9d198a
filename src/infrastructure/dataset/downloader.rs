//! Fetch the source CSV from a URL or a local file

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use super::csv_store::parse_csv;
use crate::domain::{Dataset, DomainError};

/// Where the raw dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    /// `http://` and `https://` locations are URLs; anything else is a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Download (or read) and parse the dataset. A single attempt, no retry.
pub async fn fetch_dataset(source: &DatasetSource, timeout: Duration) -> Result<Dataset, DomainError> {
    info!("Downloading data from {}...", source);

    let bytes = match source {
        DatasetSource::Url(url) => download(url, timeout).await?,
        DatasetSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
            DomainError::io(format!("Error loading data from {}: {}", path.display(), e))
        })?,
    };

    parse_csv(bytes.as_slice())
}

async fn download(url: &str, timeout: Duration) -> Result<Vec<u8>, DomainError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::internal(format!("Cannot build HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DomainError::upstream(format!("Error downloading {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DomainError::upstream(format!(
            "Error downloading {}: HTTP {}",
            url, status
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| DomainError::upstream(format!("Error reading body from {}: {}", url, e)))?;

    Ok(body.to_vec())
}
