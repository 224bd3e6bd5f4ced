//! CART decision tree classification: train, predict, render, persist.
//!
//! Grows a binary tree by exhaustive greedy search over every
//! `(feature, training value)` pair, scoring partitions by weighted Gini
//! impurity. Splits use one predicate kind per tree: a `<` threshold for
//! ordered features or `==` for categorical ones.

mod error;
mod impurity;
mod node;
mod predicate;
mod predict;
mod render;
mod serialize;
mod split;
mod tree;
mod vote;

pub use error::{CartError, ErrorKind};
pub use impurity::{gini, weighted_gini};
pub use node::{FeatureIndex, Impurity, Node};
pub use predicate::{ParsePredicateError, Predicate};
pub use predict::prediction_accuracy;
pub use serialize::model_predicate;
pub use split::{Partition, SplitCandidate, find_best_split};
pub use tree::{DecisionTree, TreeConfig, train};
pub use vote::majority_label;
