//! Prediction result types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Binary potability label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Potability {
    NotPotable,
    Potable,
}

impl Potability {
    /// Integer label as used in the dataset and on the wire
    pub fn as_label(&self) -> u8 {
        match self {
            Self::NotPotable => 0,
            Self::Potable => 1,
        }
    }

    /// Parse an integer label; anything other than 0 or 1 is rejected
    pub fn from_label(label: u8) -> Result<Self, DomainError> {
        match label {
            0 => Ok(Self::NotPotable),
            1 => Ok(Self::Potable),
            other => Err(DomainError::validation(format!(
                "Invalid potability label {}: expected 0 or 1",
                other
            ))),
        }
    }

    /// Human-readable verdict
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Potable => "Water is Consumable",
            Self::NotPotable => "Water is Not Consumable",
        }
    }
}

/// Outcome of a single prediction call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: u8,
    pub result: String,
}

impl PredictionResult {
    pub fn potability(&self) -> Result<Potability, DomainError> {
        Potability::from_label(self.prediction)
    }

    pub fn is_potable(&self) -> bool {
        self.prediction == Potability::Potable.as_label()
    }
}

impl From<Potability> for PredictionResult {
    fn from(potability: Potability) -> Self {
        Self {
            prediction: potability.as_label(),
            result: potability.verdict().to_string(),
        }
    }
}
