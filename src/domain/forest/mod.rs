//! Random Forest classifier: CART trees grown on bootstrap samples with
//! Gini impurity, soft-voting prediction and impurity-based importances

mod config;
mod forest;
mod split;
mod tree;

pub use config::{ForestParams, MaxFeatures};
pub use forest::RandomForest;
pub use tree::{DecisionTree, Node};
