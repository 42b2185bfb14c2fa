use rand::rngs::StdRng;
use rand::seq::index;

use super::model::{DecisionTree, TreeNode};
use crate::ml::{TrainDataset, TrainError};

/// Growth limits for a decision tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Maximum depth (`None` grows until leaves are pure).
    pub max_depth: Option<usize>,
    /// Minimum rows a node needs before it may split.
    pub min_samples_split: usize,
    /// Minimum rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Features sampled per split (`None` considers all of them).
    pub max_features: Option<usize>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// Fit a CART decision tree on every row of `dataset`.
pub fn train_decision_tree(
    dataset: &TrainDataset,
    options: &TreeOptions,
) -> Result<DecisionTree, TrainError> {
    dataset.validate()?;
    let indices: Vec<usize> = (0..dataset.len()).collect();
    Ok(grow_tree(dataset, indices, options, None))
}

/// Grow a tree over the rows at `indices` (duplicates allowed for bootstrap samples).
///
/// Feature subsampling only happens when both `max_features` and `rng` are set.
pub(crate) fn grow_tree(
    dataset: &TrainDataset,
    indices: Vec<usize>,
    options: &TreeOptions,
    rng: Option<&mut StdRng>,
) -> DecisionTree {
    let mut builder = TreeBuilder {
        dataset,
        options,
        rng,
        nodes: Vec::new(),
    };
    builder.build(indices, 0);
    DecisionTree {
        n_features: dataset.n_features,
        n_classes: dataset.classes.len(),
        nodes: builder.nodes,
    }
}

struct TreeBuilder<'a> {
    dataset: &'a TrainDataset,
    options: &'a TreeOptions,
    rng: Option<&'a mut StdRng>,
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

impl TreeBuilder<'_> {
    fn build(&mut self, indices: Vec<usize>, depth: usize) -> u32 {
        let counts = class_counts(&self.dataset.y, &indices, self.dataset.classes.len());
        let node_idx = self.nodes.len() as u32;
        let split = if self.should_stop(&counts, indices.len(), depth) {
            None
        } else {
            self.best_split(&indices, &counts)
        };
        let Some(split) = split else {
            self.nodes.push(leaf(&counts, indices.len()));
            return node_idx;
        };

        // Reserve the slot so children land after their parent.
        self.nodes.push(TreeNode::Leaf {
            distribution: Vec::new(),
        });
        let dataset = self.dataset;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| dataset.x[i][split.feature] <= split.threshold);
        let left = self.build(left_rows, depth + 1);
        let right = self.build(right_rows, depth + 1);
        self.nodes[node_idx as usize] = TreeNode::Split {
            feature_index: split.feature as u16,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn should_stop(&self, counts: &[usize], n_rows: usize, depth: usize) -> bool {
        let options = self.options;
        n_rows < options.min_samples_split.max(2)
            || n_rows < 2 * options.min_samples_leaf.max(1)
            || counts.iter().filter(|&&c| c > 0).count() <= 1
            || options.max_depth.is_some_and(|max| depth >= max)
    }

    fn best_split(&mut self, indices: &[usize], counts: &[usize]) -> Option<SplitCandidate> {
        let min_leaf = self.options.min_samples_leaf.max(1);
        let mut best: Option<SplitCandidate> = None;
        for feature in self.candidate_features() {
            let Some(split) = best_split_for_feature(self.dataset, indices, feature, counts, min_leaf)
            else {
                continue;
            };
            if best.as_ref().is_none_or(|b| split.impurity < b.impurity) {
                best = Some(split);
            }
        }
        best
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let n_features = self.dataset.n_features;
        match (self.options.max_features, self.rng.as_deref_mut()) {
            (Some(k), Some(rng)) if k < n_features => {
                let mut features = index::sample(rng, n_features, k.max(1)).into_vec();
                features.sort_unstable();
                features
            }
            _ => (0..n_features).collect(),
        }
    }
}

fn best_split_for_feature(
    dataset: &TrainDataset,
    indices: &[usize],
    feature: usize,
    counts: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let mut pairs: Vec<(f32, usize)> = indices
        .iter()
        .map(|&i| (dataset.x[i][feature], dataset.y[i]))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = pairs.len();
    let mut left = vec![0usize; counts.len()];
    let mut right = counts.to_vec();
    let mut best: Option<SplitCandidate> = None;
    for i in 0..n.saturating_sub(1) {
        let (value, label) = pairs[i];
        left[label] += 1;
        right[label] -= 1;
        let next = pairs[i + 1].0;
        // Equal neighbours cannot be separated; NaN never compares less.
        if !(value < next) {
            continue;
        }
        let left_n = i + 1;
        let right_n = n - left_n;
        if left_n < min_leaf || right_n < min_leaf {
            continue;
        }
        let impurity = (left_n as f64 * gini(&left, left_n)
            + right_n as f64 * gini(&right, right_n))
            / n as f64;
        if best.as_ref().is_none_or(|b| impurity < b.impurity) {
            best = Some(SplitCandidate {
                feature,
                threshold: midpoint(value, next),
                impurity,
            });
        }
    }
    best
}

fn midpoint(low: f32, high: f32) -> f32 {
    let mid = low / 2.0 + high / 2.0;
    if mid >= low && mid < high { mid } else { low }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn class_counts(y: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[y[i]] += 1;
    }
    counts
}

fn leaf(counts: &[usize], n_rows: usize) -> TreeNode {
    let total = n_rows.max(1) as f32;
    TreeNode::Leaf {
        distribution: counts.iter().map(|&c| c as f32 / total).collect(),
    }
}
