//! Forest hyper-parameters

use serde::{Deserialize, Serialize};

use crate::domain::dataset::DEFAULT_SEED;
use crate::domain::error::DomainError;

/// Number of candidate features examined at each split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(n_features)))`
    #[default]
    Sqrt,
    /// Every feature
    All,
    /// A fixed number, capped at the feature count
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            Self::Sqrt => (n_features as f64).sqrt().floor() as usize,
            Self::All => n_features,
            Self::Count(count) => *count,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Random Forest training parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    #[serde(default)]
    pub max_features: MaxFeatures,
    #[serde(default = "default_bootstrap")]
    pub bootstrap: bool,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_bootstrap() -> bool {
    true
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: default_seed(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            max_features: MaxFeatures::default(),
            bootstrap: default_bootstrap(),
        }
    }
}

impl ForestParams {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.n_estimators == 0 {
            return Err(DomainError::validation("n_estimators must be at least 1"));
        }
        if self.min_samples_split < 2 {
            return Err(DomainError::validation(
                "min_samples_split must be at least 2",
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(DomainError::validation("min_samples_leaf must be at least 1"));
        }
        if self.max_depth == Some(0) {
            return Err(DomainError::validation("max_depth must be at least 1"));
        }
        if self.max_features == MaxFeatures::Count(0) {
            return Err(DomainError::validation("max_features must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
        assert_eq!(MaxFeatures::All.resolve(9), 9);
        assert_eq!(MaxFeatures::Count(20).resolve(9), 9);
    }

    #[test]
    fn test_validate() {
        assert!(ForestParams::new(100).validate().is_ok());
        assert!(ForestParams::new(0).validate().is_err());

        let mut params = ForestParams::new(10);
        params.min_samples_split = 1;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let params: ForestParams = serde_json::from_str(r#"{"n_estimators": 50}"#).unwrap();
        assert_eq!(params.n_estimators, 50);
        assert_eq!(params.seed, 42);
        assert_eq!(params.max_features, MaxFeatures::Sqrt);
        assert!(params.bootstrap);
    }
}
