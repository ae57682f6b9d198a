//! Feature schema embedded in every artifact

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::DomainError;
use crate::domain::sample::{FEATURE_NAMES, LABEL_COLUMN};

/// Ordered feature names the model was trained on, plus a fingerprint
/// that changes whenever the names or their order change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub feature_names: Vec<String>,
    pub label: String,
    pub fingerprint: String,
}

impl FeatureSchema {
    pub fn new(feature_names: Vec<String>, label: impl Into<String>) -> Self {
        let fingerprint = fingerprint(&feature_names);
        Self {
            feature_names,
            label: label.into(),
            fingerprint,
        }
    }

    /// The schema the prediction API serves
    pub fn water_sample() -> Self {
        Self::new(
            FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            LABEL_COLUMN,
        )
    }

    /// Fail unless `other` has exactly the same features in the same order
    pub fn ensure_matches(&self, other: &FeatureSchema) -> Result<(), DomainError> {
        if self.feature_names != other.feature_names {
            return Err(DomainError::artifact(format!(
                "feature order mismatch: expected [{}], found [{}]",
                self.feature_names.join(", "),
                other.feature_names.join(", ")
            )));
        }

        if self.fingerprint != other.fingerprint {
            return Err(DomainError::artifact(format!(
                "schema fingerprint mismatch: expected {}, found {}",
                self.fingerprint, other.fingerprint
            )));
        }

        Ok(())
    }

    /// Recompute the fingerprint and compare with the stored one
    pub fn verify_fingerprint(&self) -> Result<(), DomainError> {
        let expected = fingerprint(&self.feature_names);
        if expected != self.fingerprint {
            return Err(DomainError::artifact(format!(
                "schema fingerprint {} does not match its feature names (expected {})",
                self.fingerprint, expected
            )));
        }
        Ok(())
    }
}

fn fingerprint(feature_names: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(feature_names.join(",").as_bytes());
    hex::encode(hasher.finalize())
}
