//! Water sample domain - the fixed 9-feature input schema

mod entity;

pub use entity::{WaterSample, FEATURE_COUNT, FEATURE_NAMES, LABEL_COLUMN};
