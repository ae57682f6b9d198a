//! CART decision tree stored as a flat node array

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::split::{best_split, class_counts};
use crate::domain::error::DomainError;

/// A node in a fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Terminal node holding the class distribution of its training samples
    Leaf { distribution: Vec<f64> },
    /// Samples with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        gain: f64,
    },
}

/// A fitted classification tree; the root is node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
}

/// Stopping and sampling rules used while growing one tree
pub(super) struct GrowthRules {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: usize,
}

struct Builder<'a, R: Rng + ?Sized> {
    features: &'a [Vec<f64>],
    labels: &'a [usize],
    n_classes: usize,
    rules: &'a GrowthRules,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

impl<R: Rng + ?Sized> Builder<'_, R> {
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let counts = class_counts(self.labels, indices, self.n_classes);
        let node_index = self.nodes.len();
        self.nodes.push(leaf_from_counts(&counts));

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_small = indices.len() < self.rules.min_samples_split;
        let too_deep = self.rules.max_depth.is_some_and(|max| depth >= max);
        if pure || too_small || too_deep {
            return node_index;
        }

        let Some(split) = best_split(
            self.features,
            self.labels,
            indices,
            self.n_classes,
            self.rules.max_features,
            self.rules.min_samples_leaf,
            &mut *self.rng,
        ) else {
            return node_index;
        };

        let mid = partition(indices, |i| self.features[i][split.feature] <= split.threshold);
        let (left_indices, right_indices) = indices.split_at_mut(mid);

        let left = self.grow(left_indices, depth + 1);
        let right = self.grow(right_indices, depth + 1);

        self.nodes[node_index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            gain: split.gain,
        };

        node_index
    }
}

fn leaf_from_counts(counts: &[usize]) -> Node {
    let total: usize = counts.iter().sum();
    let distribution = counts
        .iter()
        .map(|&c| {
            if total == 0 {
                0.0
            } else {
                c as f64 / total as f64
            }
        })
        .collect();
    Node::Leaf { distribution }
}

/// Reorder `indices` so that elements matching `goes_left` come first;
/// returns the number of such elements
fn partition(indices: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for i in 0..indices.len() {
        if goes_left(indices[i]) {
            indices.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `indices` (duplicates allowed,
    /// as produced by bootstrap sampling)
    pub(super) fn fit<R: Rng + ?Sized>(
        features: &[Vec<f64>],
        labels: &[usize],
        mut indices: Vec<usize>,
        n_classes: usize,
        rules: &GrowthRules,
        rng: &mut R,
    ) -> Self {
        let n_features = features.first().map(Vec::len).unwrap_or(0);
        let mut builder = Builder {
            features,
            labels,
            n_classes,
            rules,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(&mut indices, 0);

        Self {
            nodes: builder.nodes,
            n_features,
            n_classes,
        }
    }

    /// Class distribution of the leaf reached by `x`.
    ///
    /// The caller guarantees `x.len() == self.n_features()`.
    pub fn leaf_distribution(&self, x: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Unnormalized impurity decrease accumulated per feature
    pub fn impurity_decrease(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_features];
        for node in &self.nodes {
            if let Node::Split { feature, gain, .. } = node {
                totals[*feature] += gain;
            }
        }
        totals
    }

    /// Check structure after deserialization: every child index points
    /// forward inside the array, every feature exists, every leaf has one
    /// probability per class.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.nodes.is_empty() {
            return Err(DomainError::artifact("tree has no nodes"));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.len() != self.n_classes {
                        return Err(DomainError::artifact(format!(
                            "leaf {} has {} class probabilities, expected {}",
                            index,
                            distribution.len(),
                            self.n_classes
                        )));
                    }
                }
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= self.n_features {
                        return Err(DomainError::artifact(format!(
                            "node {} splits on feature {} of {}",
                            index, feature, self.n_features
                        )));
                    }
                    for child in [left, right] {
                        if *child <= index || *child >= self.nodes.len() {
                            return Err(DomainError::artifact(format!(
                                "node {} has invalid child {}",
                                index, child
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.node_depth(0)
    }

    fn node_depth(&self, index: usize) -> usize {
        match &self.nodes[index] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.node_depth(*left).max(self.node_depth(*right))
            }
        }
    }
}
