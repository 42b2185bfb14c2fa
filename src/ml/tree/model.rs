use serde::{Deserialize, Serialize};

use crate::ml::Classifier;

/// Node of a flattened decision tree; children always sit after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        /// Feature index used for the split.
        feature_index: u16,
        /// Threshold in feature units.
        threshold: f32,
        /// Node for `feature <= threshold`.
        left: u32,
        /// Node for `feature > threshold`.
        right: u32,
    },
    Leaf {
        /// Class probabilities, one per class.
        distribution: Vec<f32>,
    },
}

/// Decision tree classifier stored as a node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Number of `f32` values per feature vector.
    pub n_features: usize,
    /// Number of classes in each leaf distribution.
    pub n_classes: usize,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Validate structural invariants of the tree.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        if self.n_classes < 2 {
            return Err("Tree must contain at least 2 classes".to_string());
        }
        let n_nodes = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature_index as usize >= self.n_features {
                        return Err(format!(
                            "Node {idx} splits on feature {feature_index} but the tree has {} features",
                            self.n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("Node {idx} has a NaN threshold"));
                    }
                    for child in [*left as usize, *right as usize] {
                        if child <= idx || child >= n_nodes {
                            return Err(format!("Node {idx} has invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != self.n_classes {
                        return Err(format!(
                            "Leaf {idx} has {} probabilities but expected {}",
                            distribution.len(),
                            self.n_classes
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Class distribution of the leaf `features` falls into.
    pub fn leaf_distribution(&self, features: &[f32]) -> Option<&[f32]> {
        let mut idx = 0usize;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx)? {
                TreeNode::Leaf { distribution } => return Some(distribution),
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features
                        .get(*feature_index as usize)
                        .copied()
                        .unwrap_or(0.0);
                    idx = (if value <= *threshold { *left } else { *right }) as usize;
                }
            }
        }
        None
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                let next = depths[idx] + 1;
                for child in [*left as usize, *right as usize] {
                    if let Some(slot) = depths.get_mut(child) {
                        *slot = next;
                        max_depth = max_depth.max(next);
                    }
                }
            }
        }
        max_depth
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }
}

impl Classifier for DecisionTree {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        match self.leaf_distribution(features) {
            Some(distribution) => distribution.to_vec(),
            None => vec![1.0 / self.n_classes.max(1) as f32; self.n_classes],
        }
    }
}
