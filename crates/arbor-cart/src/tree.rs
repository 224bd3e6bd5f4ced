use std::hash::Hash;

use tracing::{debug, instrument};

use crate::{
    CartError,
    node::{FeatureIndex, Node},
    predicate::Predicate,
    split::{SplitCandidate, search, validate_dataset},
    vote::majority_label,
};

/// Configuration for growing a CART decision tree.
///
/// Construct via [`TreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter       | Default     |
/// |-----------------|-------------|
/// | `min_leaf_size` | 1           |
/// | `predicate`     | `Threshold` |
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub(crate) max_depth: usize,
    pub(crate) min_leaf_size: usize,
    pub(crate) predicate: Predicate,
}

impl TreeConfig {
    /// Create a new config with the given depth limit.
    ///
    /// The root split sits at depth 1, so `max_depth = 1` yields a single
    /// split with two leaves.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidMaxDepth`] if `max_depth` is zero.
    pub fn new(max_depth: usize) -> Result<Self, CartError> {
        if max_depth == 0 {
            return Err(CartError::InvalidMaxDepth { max_depth });
        }
        Ok(Self {
            max_depth,
            min_leaf_size: 1,
            predicate: Predicate::Threshold,
        })
    }

    /// Set the leaf size at or below which a side stops splitting.
    #[must_use]
    pub fn with_min_leaf_size(mut self, min_leaf_size: usize) -> Self {
        self.min_leaf_size = min_leaf_size;
        self
    }

    /// Set the predicate kind used by every node of the tree.
    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    // --- Getters ---

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum leaf size.
    #[must_use]
    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    /// Return the predicate kind.
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    /// Train a decision tree on the provided row-major dataset.
    ///
    /// `rows[sample_idx][feature_idx]` is the feature table and
    /// `labels[sample_idx]` the class of each row.
    ///
    /// # Errors
    ///
    /// | Variant                              | When                              |
    /// |--------------------------------------|-----------------------------------|
    /// | [`CartError::EmptyDataset`]          | `rows` is empty                   |
    /// | [`CartError::LabelCountMismatch`]    | `labels.len() != rows.len()`      |
    /// | [`CartError::ZeroFeatures`]          | rows have zero feature columns    |
    /// | [`CartError::FeatureCountMismatch`]  | rows have inconsistent lengths    |
    #[instrument(skip(self, rows, labels), fields(n_rows = rows.len()))]
    pub fn fit<V, L>(&self, rows: &[Vec<V>], labels: &[L]) -> Result<DecisionTree<V, L>, CartError>
    where
        V: Clone + PartialOrd,
        L: Clone + Eq + Hash,
    {
        let n_features = validate_dataset(rows, labels)?;

        debug!(
            n_rows = rows.len(),
            n_features,
            max_depth = self.max_depth,
            min_leaf_size = self.min_leaf_size,
            predicate = %self.predicate,
            "fitting decision tree"
        );

        let grower = Grower {
            rows,
            labels,
            n_features,
            config: self,
        };
        let indices: Vec<usize> = (0..rows.len()).collect();
        let root_split = search(rows, labels, &indices, n_features, self.predicate)
            .ok_or(CartError::ZeroFeatures)?;
        let root = grower.grow(root_split, 1)?;

        debug!(
            n_nodes = root.n_nodes(),
            n_leaves = root.n_leaves(),
            depth = root.depth(),
            "decision tree built"
        );

        Ok(DecisionTree {
            root,
            predicate: self.predicate,
            n_features,
            feature_names: None,
        })
    }
}

/// Train a decision tree in one call.
///
/// Equivalent to
/// `TreeConfig::new(max_depth)?.with_min_leaf_size(min_leaf_size).with_predicate(predicate).fit(rows, labels)`.
///
/// # Errors
///
/// [`CartError::InvalidMaxDepth`] when `max_depth` is zero, otherwise the
/// errors of [`TreeConfig::fit`].
pub fn train<V, L>(
    rows: &[Vec<V>],
    labels: &[L],
    max_depth: usize,
    min_leaf_size: usize,
    predicate: Predicate,
) -> Result<DecisionTree<V, L>, CartError>
where
    V: Clone + PartialOrd,
    L: Clone + Eq + Hash,
{
    TreeConfig::new(max_depth)?
        .with_min_leaf_size(min_leaf_size)
        .with_predicate(predicate)
        .fit(rows, labels)
}

/// Borrowed training state shared by every recursive growth step.
struct Grower<'a, V, L> {
    rows: &'a [Vec<V>],
    labels: &'a [L],
    n_features: usize,
    config: &'a TreeConfig,
}

impl<V, L> Grower<'_, V, L>
where
    V: Clone + PartialOrd,
    L: Clone + Eq + Hash,
{
    /// Turn a split into an internal node at `depth`, resolving both children.
    ///
    /// Stopping rules, in order: a degenerate split gets one majority leaf on
    /// both sides; reaching `max_depth` gets one majority leaf per side;
    /// otherwise each side is resolved by [`Grower::child`].
    fn grow(&self, split: SplitCandidate<V>, depth: usize) -> Result<Node<V, L>, CartError> {
        let SplitCandidate {
            feature,
            value,
            partition,
            ..
        } = split;
        let (left, right) = partition.into_sides();

        let (left, right) = if left.is_empty() || right.is_empty() {
            let both: Vec<usize> = left.iter().chain(&right).copied().collect();
            let leaf = self.leaf(&both)?;
            (leaf.clone(), leaf)
        } else if depth >= self.config.max_depth {
            (self.leaf(&left)?, self.leaf(&right)?)
        } else {
            (self.child(&left, depth)?, self.child(&right, depth)?)
        };

        Ok(internal(feature, value, left, right))
    }

    /// Resolve one side of a non-degenerate split made at `depth`.
    fn child(&self, indices: &[usize], depth: usize) -> Result<Node<V, L>, CartError> {
        if indices.len() <= self.config.min_leaf_size {
            return self.leaf(indices);
        }
        match search(
            self.rows,
            self.labels,
            indices,
            self.n_features,
            self.config.predicate,
        ) {
            Some(split) => self.grow(split, depth + 1),
            None => self.leaf(indices),
        }
    }

    fn leaf(&self, indices: &[usize]) -> Result<Node<V, L>, CartError> {
        let label = majority_label(indices.iter().map(|&i| &self.labels[i]))
            .ok_or(CartError::EmptyDataset)?;
        Ok(Node::Leaf {
            label: label.clone(),
        })
    }
}

fn internal<V, L>(feature: FeatureIndex, value: V, left: Node<V, L>, right: Node<V, L>) -> Node<V, L> {
    Node::Internal {
        feature,
        value,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// A fitted CART decision tree.
///
/// Immutable after training; prediction only borrows it, so one tree can
/// serve any number of concurrent callers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree<V, L> {
    pub(crate) root: Node<V, L>,
    pub(crate) predicate: Predicate,
    pub(crate) n_features: usize,
    /// Training header names, one per feature column, when the caller
    /// recorded them with [`DecisionTree::with_feature_names`].
    pub(crate) feature_names: Option<Vec<String>>,
}

impl<V, L> DecisionTree<V, L>
where
    V: PartialOrd,
{
    /// Predict the class label for a single sample.
    ///
    /// Walks from the root applying the tree's predicate at each internal
    /// node until a leaf is reached. Only the features read along that path
    /// need to be present.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::FeatureIndexOutOfRange`] when a visited node reads
    /// a feature index at or beyond `sample.len()`.
    pub fn predict(&self, sample: &[V]) -> Result<&L, CartError> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { label } => return Ok(label),
                Node::Internal {
                    feature,
                    value,
                    left,
                    right,
                } => {
                    let x = sample.get(feature.index()).ok_or(
                        CartError::FeatureIndexOutOfRange {
                            feature: feature.index(),
                            sample_len: sample.len(),
                        },
                    )?;
                    node = if self.predicate.goes_left(x, value) {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl<V, L> DecisionTree<V, L> {
    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node<V, L> {
        &self.root
    }

    /// Return the predicate kind every node applies.
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    /// Return the number of feature columns the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the feature column names recorded at training time, if any.
    #[must_use]
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Record the training header's feature column names on the tree.
    ///
    /// The names are saved with the model and used by
    /// [`DecisionTree::check_columns`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ColumnCountMismatch`] unless there is exactly one
    /// name per feature column.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, CartError> {
        if names.len() != self.n_features {
            return Err(CartError::ColumnCountMismatch {
                expected: self.n_features,
                got: names.len(),
            });
        }
        self.feature_names = Some(names);
        Ok(self)
    }

    /// Check a table header against the columns the tree was trained on.
    ///
    /// The width must equal [`DecisionTree::n_features`]. When names were
    /// recorded, every column must also carry the same name in the same
    /// position. [`DecisionTree::predict`] itself does not check this.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CartError::ColumnCountMismatch`] | `columns.len() != n_features` |
    /// | [`CartError::ColumnNameMismatch`] | first column whose name differs |
    pub fn check_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<(), CartError> {
        if columns.len() != self.n_features {
            return Err(CartError::ColumnCountMismatch {
                expected: self.n_features,
                got: columns.len(),
            });
        }
        let Some(names) = &self.feature_names else {
            return Ok(());
        };
        match names
            .iter()
            .zip(columns)
            .position(|(expected, got)| expected != got.as_ref())
        {
            Some(position) => Err(CartError::ColumnNameMismatch {
                position,
                expected: names[position].clone(),
                got: columns[position].as_ref().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Return the number of internal nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
