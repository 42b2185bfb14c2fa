//! CART decision tree classifier.
//!
//! - Gini impurity, binary splits at midpoints between adjacent distinct values.
//! - `feature <= threshold` goes left.
//! - Leaves keep the normalized class distribution of their training rows.
//! - Deterministic: ties keep the first feature and the lowest threshold.

mod model;
mod train;

pub use model::{DecisionTree, TreeNode};
pub use train::{TreeOptions, train_decision_tree};

pub(crate) use train::grow_tree;
