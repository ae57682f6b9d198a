//! Input widgets and form parsing

use std::collections::HashMap;

use crate::domain::{DomainError, FEATURE_COUNT, WaterSample};

/// A numeric input on the page, bound to one feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureInput {
    /// Form field name, identical to the feature name
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub help: Option<&'static str>,
}

impl FeatureInput {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Step used by the browser widget
    pub fn step(&self) -> f64 {
        if self.max - self.min > 1000.0 { 1.0 } else { 0.01 }
    }
}

/// Widgets in feature order, laid out in three columns of three
pub const FEATURE_INPUTS: [FeatureInput; FEATURE_COUNT] = [
    FeatureInput {
        name: "ph",
        label: "pH Level",
        min: 0.0,
        max: 14.0,
        default: 7.0,
        help: Some("Acid-base balance (0-14)"),
    },
    FeatureInput {
        name: "Hardness",
        label: "Hardness (mg/L)",
        min: 0.0,
        max: 400.0,
        default: 200.0,
        help: None,
    },
    FeatureInput {
        name: "Solids",
        label: "Total Dissolved Solids (ppm)",
        min: 0.0,
        max: 60000.0,
        default: 20000.0,
        help: None,
    },
    FeatureInput {
        name: "Chloramines",
        label: "Chloramines (ppm)",
        min: 0.0,
        max: 15.0,
        default: 7.0,
        help: None,
    },
    FeatureInput {
        name: "Sulfate",
        label: "Sulfate (mg/L)",
        min: 0.0,
        max: 500.0,
        default: 300.0,
        help: None,
    },
    FeatureInput {
        name: "Conductivity",
        label: "Conductivity (μS/cm)",
        min: 0.0,
        max: 800.0,
        default: 400.0,
        help: None,
    },
    FeatureInput {
        name: "Organic_carbon",
        label: "Organic Carbon (ppm)",
        min: 0.0,
        max: 30.0,
        default: 15.0,
        help: None,
    },
    FeatureInput {
        name: "Trihalomethanes",
        label: "Trihalomethanes (μg/L)",
        min: 0.0,
        max: 150.0,
        default: 60.0,
        help: None,
    },
    FeatureInput {
        name: "Turbidity",
        label: "Turbidity (NTU)",
        min: 0.0,
        max: 7.0,
        default: 4.0,
        help: None,
    },
];

pub fn default_values() -> [f64; FEATURE_COUNT] {
    FEATURE_INPUTS.map(|input| input.default)
}

/// A parsed form submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub values: [f64; FEATURE_COUNT],
    /// Fields whose submitted value fell outside the widget range
    pub clamped: Vec<&'static str>,
}

impl Submission {
    pub fn sample(&self) -> WaterSample {
        WaterSample::from_features(self.values)
    }
}

/// Read every widget from the submitted form.
///
/// Absent fields take the widget default, out-of-range values are clamped
/// into the widget range, and anything that is not a finite number is
/// rejected.
pub fn parse_submission(form: &HashMap<String, String>) -> Result<Submission, DomainError> {
    let mut values = default_values();
    let mut clamped = Vec::new();

    for (slot, input) in values.iter_mut().zip(FEATURE_INPUTS.iter()) {
        let Some(raw) = form.get(input.name).map(|v| v.trim()) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }

        let value: f64 = raw
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| {
                DomainError::validation(format!("{} must be a number, got '{}'", input.label, raw))
            })?;

        let bounded = input.clamp(value);
        if bounded != value {
            clamped.push(input.name);
        }
        *slot = bounded;
    }

    Ok(Submission { values, clamped })
}
