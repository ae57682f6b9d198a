//! Water sample entity

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 9;

/// Feature names in the order the classifier was trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "ph",
    "Hardness",
    "Solids",
    "Chloramines",
    "Sulfate",
    "Conductivity",
    "Organic_carbon",
    "Trihalomethanes",
    "Turbidity",
];

/// Name of the label column in the dataset
pub const LABEL_COLUMN: &str = "Potability";

/// A single water quality measurement.
///
/// Field names on the wire match the dataset's column headers exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub ph: f64,
    #[serde(rename = "Hardness")]
    pub hardness: f64,
    #[serde(rename = "Solids")]
    pub solids: f64,
    #[serde(rename = "Chloramines")]
    pub chloramines: f64,
    #[serde(rename = "Sulfate")]
    pub sulfate: f64,
    #[serde(rename = "Conductivity")]
    pub conductivity: f64,
    #[serde(rename = "Organic_carbon")]
    pub organic_carbon: f64,
    #[serde(rename = "Trihalomethanes")]
    pub trihalomethanes: f64,
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,
}

impl WaterSample {
    /// Build a sample from values ordered as [`FEATURE_NAMES`]
    pub fn from_features(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            ph,
            hardness,
            solids,
            chloramines,
            sulfate,
            conductivity,
            organic_carbon,
            trihalomethanes,
            turbidity,
        ] = values;

        Self {
            ph,
            hardness,
            solids,
            chloramines,
            sulfate,
            conductivity,
            organic_carbon,
            trihalomethanes,
            turbidity,
        }
    }

    /// Single-row feature vector in [`FEATURE_NAMES`] order
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.ph,
            self.hardness,
            self.solids,
            self.chloramines,
            self.sulfate,
            self.conductivity,
            self.organic_carbon,
            self.trihalomethanes,
            self.turbidity,
        ]
    }
}
