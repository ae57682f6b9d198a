//! Synthetic water quality data shared by service tests

use crate::domain::{
    Dataset, FeatureSchema, ForestParams, ModelArtifact, RandomForest, WaterSample,
    FEATURE_NAMES, LABEL_COLUMN,
};

/// Potable rows have neutral pH and low turbidity; the rest are acidic and
/// cloudy. Every fifth row has its pH and Sulfate blanked.
pub fn water_dataset(rows_per_class: usize, with_gaps: bool) -> Dataset {
    let mut columns: Vec<String> = FEATURE_NAMES.iter().map(|c| c.to_string()).collect();
    columns.push(LABEL_COLUMN.to_string());

    let mut rows = Vec::with_capacity(rows_per_class * 2);
    for i in 0..rows_per_class {
        let jitter = (i % 10) as f64 * 0.05;
        rows.push(row(clean_features(jitter), 1.0));
        rows.push(row(dirty_features(jitter), 0.0));
    }

    if with_gaps {
        for (index, row) in rows.iter_mut().enumerate() {
            if index % 5 == 0 {
                row[0] = None;
                row[4] = None;
            }
        }
    }

    Dataset::new(columns, rows).expect("fixture rows match columns")
}

fn row(features: [f64; 9], label: f64) -> Vec<Option<f64>> {
    features
        .iter()
        .copied()
        .chain(std::iter::once(label))
        .map(Some)
        .collect()
}

fn clean_features(jitter: f64) -> [f64; 9] {
    [
        7.0 + jitter,
        180.0 + jitter,
        15000.0,
        6.5,
        320.0 - jitter,
        400.0,
        12.0,
        55.0,
        2.0 + jitter,
    ]
}

fn dirty_features(jitter: f64) -> [f64; 9] {
    [
        4.0 - jitter,
        260.0 - jitter,
        35000.0,
        9.5,
        250.0 + jitter,
        520.0,
        18.0,
        90.0,
        6.0 - jitter,
    ]
}

pub fn clean_sample() -> WaterSample {
    WaterSample::from_features(clean_features(0.1))
}

pub fn dirty_sample() -> WaterSample {
    WaterSample::from_features(dirty_features(0.1))
}

/// A small forest trained on [`water_dataset`]
pub fn water_artifact() -> ModelArtifact {
    let labeled = water_dataset(30, false)
        .split_label(LABEL_COLUMN)
        .expect("fixture has label column");
    let labels: Vec<usize> = labeled.labels.iter().map(|l| l.as_label() as usize).collect();
    let params = ForestParams::new(10);
    let forest =
        RandomForest::fit(&labeled.features, &labels, 2, &params).expect("fixture forest fits");

    ModelArtifact::new(
        FeatureSchema::new(labeled.feature_names, LABEL_COLUMN),
        params,
        forest,
        1.0,
        labels.len(),
    )
}

/// A valid artifact whose schema is not the water sample schema
pub fn two_feature_artifact() -> ModelArtifact {
    let features = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.1, 0.9], vec![0.9, 0.2]];
    let labels = vec![0, 1, 0, 1];
    let params = ForestParams::new(3);
    let forest = RandomForest::fit(&features, &labels, 2, &params).expect("fixture forest fits");

    ModelArtifact::new(
        FeatureSchema::new(vec!["a".into(), "b".into()], LABEL_COLUMN),
        params,
        forest,
        1.0,
        4,
    )
}
