//! Inference-only decision trees and random forests.
//!
//! Trees arrive fully grown inside the model artifact; this module replays
//! them. Forest probabilities are vote proportions across trees, so the
//! distribution always sums to 1 and the predicted class is its argmax.
//!
//! # Example
//!
//! ```
//! use vinifera::tree::{DecisionTreeClassifier, RandomForestClassifier, TreeNode};
//! use vinifera::traits::Classifier;
//!
//! let stump = DecisionTreeClassifier::new(TreeNode::Split {
//!     feature: 0,
//!     threshold: 0.0,
//!     left: Box::new(TreeNode::Leaf { class: 1 }),
//!     right: Box::new(TreeNode::Leaf { class: 0 }),
//! });
//!
//! let forest = RandomForestClassifier::new(vec![stump], 2).expect("valid forest");
//! assert_eq!(forest.predict(&[1.5]).expect("predict"), 0);
//! ```

use crate::error::{Result, ViniferaError};
use crate::traits::Classifier;
use serde::{Deserialize, Serialize};

/// One node of a grown decision tree.
///
/// Samples with `x[feature] <= threshold` go left, everything else right.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Terminal node voting for a single class.
    Leaf {
        /// Class index this leaf votes for
        class: usize,
    },
    /// Binary split on one feature.
    Split {
        /// Feature index tested by this split
        feature: usize,
        /// Split threshold; `<=` goes left
        threshold: f64,
        /// Subtree for samples at or below the threshold
        left: Box<TreeNode>,
        /// Subtree for samples above the threshold
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Largest class index reachable from this node.
    fn max_class(&self) -> usize {
        match self {
            TreeNode::Leaf { class } => *class,
            TreeNode::Split { left, right, .. } => left.max_class().max(right.max_class()),
        }
    }

    /// Largest feature index tested anywhere below this node.
    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => {
                let below = left.max_feature().max(right.max_feature());
                Some(below.map_or(*feature, |b| b.max(*feature)))
            }
        }
    }
}

/// A single grown decision tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionTreeClassifier {
    root: TreeNode,
}

impl DecisionTreeClassifier {
    /// Wraps a grown tree.
    #[must_use]
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// Predicts the class for one feature vector by walking the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a split references a feature index beyond the
    /// vector's length; that indicates an artifact/pipeline contract
    /// violation, not bad caller input.
    pub fn predict_one(&self, features: &[f64]) -> Result<usize> {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { class } => return Ok(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        ViniferaError::internal(format!(
                            "tree split references feature {feature} but vector has {} entries",
                            features.len()
                        ))
                    })?;
                    node = if *value <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// Random forest classifier over pre-grown trees.
///
/// Follows majority voting: each tree casts one vote, and the class
/// probability distribution is the per-class vote fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Creates a forest from grown trees.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is empty, has fewer than two classes,
    /// or contains a tree voting past `n_classes`.
    pub fn new(trees: Vec<DecisionTreeClassifier>, n_classes: usize) -> Result<Self> {
        let forest = Self { trees, n_classes };
        forest.check_consistent()?;
        Ok(forest)
    }

    /// Number of trees in the forest.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Largest feature index any tree tests, if any tree splits at all.
    #[must_use]
    pub fn max_feature_index(&self) -> Option<usize> {
        self.trees
            .iter()
            .filter_map(|t| t.root.max_feature())
            .max()
    }

    /// Verifies the forest describes a usable classifier.
    ///
    /// Deserialization bypasses [`RandomForestClassifier::new`], so artifact
    /// loading re-runs this check.
    ///
    /// # Errors
    ///
    /// Returns an artifact-corrupt error for empty forests, degenerate class
    /// counts, or leaves voting outside the class range.
    pub fn check_consistent(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ViniferaError::corrupt("random forest has no trees"));
        }
        if self.n_classes < 2 {
            return Err(ViniferaError::corrupt(format!(
                "random forest declares {} classes, need at least 2",
                self.n_classes
            )));
        }
        for tree in &self.trees {
            let max_class = tree.root.max_class();
            if max_class >= self.n_classes {
                return Err(ViniferaError::corrupt(format!(
                    "tree leaf votes for class {max_class} but forest has {} classes",
                    self.n_classes
                )));
            }
        }
        Ok(())
    }
}

impl Classifier for RandomForestClassifier {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Vote proportions across trees; each row sums to 1.0.
    fn predict_distribution(&self, features: &[f64]) -> Result<Vec<f64>> {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let class = tree.predict_one(features)?;
            votes[class] += 1;
        }

        let n_trees = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v as f64 / n_trees).collect())
    }
}
