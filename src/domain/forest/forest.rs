//! Random Forest ensemble

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::ForestParams;
use super::tree::{DecisionTree, GrowthRules};
use crate::domain::error::DomainError;

/// An ensemble of decision trees predicting by averaged leaf probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Fit a forest on row-major `features` and class indices `labels`.
    ///
    /// Each tree draws its own RNG seed from a master RNG seeded with
    /// `params.seed`, so the same inputs always produce the same forest.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, DomainError> {
        params.validate()?;
        let n_features = check_training_data(features, labels, n_classes)?;

        let rules = GrowthRules {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features: params.max_features.resolve(n_features),
        };

        let n_samples = features.len();
        let mut master = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let mut rng = StdRng::seed_from_u64(master.r#gen());
            let indices: Vec<usize> = if params.bootstrap {
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };

            trees.push(DecisionTree::fit(
                features, labels, indices, n_classes, &rules, &mut rng,
            ));
        }

        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    /// Mean class probabilities over all trees.
    ///
    /// Fails with an inference error when `x` does not have exactly the
    /// number of features the forest was trained on.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, DomainError> {
        if x.len() != self.n_features {
            return Err(DomainError::inference(format!(
                "X has {} features, but the model is expecting {} features as input",
                x.len(),
                self.n_features
            )));
        }

        let mut probabilities = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, p) in probabilities.iter_mut().zip(tree.leaf_distribution(x)) {
                *total += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        for p in &mut probabilities {
            *p /= n_trees;
        }

        Ok(probabilities)
    }

    /// Most probable class; ties go to the lower class index
    pub fn predict(&self, x: &[f64]) -> Result<usize, DomainError> {
        let probabilities = self.predict_proba(x)?;
        let mut best = 0;
        for (class, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = class;
            }
        }
        Ok(best)
    }

    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>, DomainError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Mean decrease in impurity per feature, normalized to sum to 1.
    ///
    /// Each tree's contribution is normalized before averaging so that
    /// deep trees do not dominate.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut importances = vec![0.0; self.n_features];

        for tree in &self.trees {
            let decrease = tree.impurity_decrease();
            let total: f64 = decrease.iter().sum();
            if total > 0.0 {
                for (importance, d) in importances.iter_mut().zip(decrease) {
                    *importance += d / total;
                }
            }
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for importance in &mut importances {
                *importance /= total;
            }
        }

        importances
    }

    /// Structural check of a deserialized forest
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.trees.is_empty() {
            return Err(DomainError::artifact("forest has no trees"));
        }
        if self.n_classes < 2 {
            return Err(DomainError::artifact(format!(
                "forest has {} classes, expected at least 2",
                self.n_classes
            )));
        }

        for (index, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features || tree.n_classes() != self.n_classes {
                return Err(DomainError::artifact(format!(
                    "tree {} shape ({} features, {} classes) differs from forest ({}, {})",
                    index,
                    tree.n_features(),
                    tree.n_classes(),
                    self.n_features,
                    self.n_classes
                )));
            }
            tree.validate()
                .map_err(|e| DomainError::artifact(format!("tree {}: {}", index, e)))?;
        }

        Ok(())
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

fn check_training_data(
    features: &[Vec<f64>],
    labels: &[usize],
    n_classes: usize,
) -> Result<usize, DomainError> {
    let n_features = features
        .first()
        .map(Vec::len)
        .ok_or_else(|| DomainError::validation("cannot fit a forest on zero samples"))?;

    if n_features == 0 {
        return Err(DomainError::validation("training data has no feature columns"));
    }
    if labels.len() != features.len() {
        return Err(DomainError::validation(format!(
            "{} feature rows but {} labels",
            features.len(),
            labels.len()
        )));
    }
    if n_classes < 2 {
        return Err(DomainError::validation("at least 2 classes are required"));
    }

    for (index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(DomainError::validation(format!(
                "row {} has {} features, expected {}",
                index,
                row.len(),
                n_features
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::validation(format!(
                "row {} contains a non-finite value",
                index
            )));
        }
    }

    if let Some(label) = labels.iter().find(|&&l| l >= n_classes) {
        return Err(DomainError::validation(format!(
            "label {} is out of range for {} classes",
            label, n_classes
        )));
    }

    Ok(n_features)
}
