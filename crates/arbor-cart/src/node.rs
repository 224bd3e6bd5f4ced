use std::fmt;

/// Zero-based feature column index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based column position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weighted Gini impurity of a candidate partition.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd,
    serde::Serialize, serde::Deserialize,
)]
pub struct Impurity(f64);

impl Impurity {
    /// Create a new impurity value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw impurity value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A node in a trained decision tree.
///
/// Children are boxed and owned by exactly one parent. The tree is built
/// top-down once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Node<V, L> {
    /// An interior split node.
    Internal {
        /// Feature column the predicate reads.
        feature: FeatureIndex,
        /// Training value the sample is compared against.
        value: V,
        /// Subtree for samples the predicate accepts.
        left: Box<Node<V, L>>,
        /// Subtree for samples the predicate rejects.
        right: Box<Node<V, L>>,
    },
    /// A terminal leaf node.
    Leaf {
        /// Majority label of the training rows that reached this leaf.
        label: L,
    },
}

impl<V, L> Node<V, L> {
    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => 1 + left.n_nodes() + right.n_nodes(),
        }
    }

    /// Number of leaves in this subtree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    /// Length of the longest root-to-leaf path, counted in edges.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureIndex, Impurity, Node};

    // --- FeatureIndex ---

    #[test]
    fn feature_index_display() {
        let fi = FeatureIndex::new(3);
        assert_eq!(format!("{fi}"), "3");
        assert_eq!(fi.index(), 3);
    }

    #[test]
    fn feature_index_ordering() {
        assert!(FeatureIndex::new(1) < FeatureIndex::new(5));
    }

    // --- Impurity ---

    #[test]
    fn impurity_display() {
        let imp = Impurity::new(1.0 / 3.0);
        assert_eq!(format!("{imp}"), "0.333333");
    }

    #[test]
    fn impurity_ordering() {
        assert!(Impurity::new(0.1) < Impurity::new(0.5));
    }

    // --- Node ---

    fn leaf(label: u8) -> Box<Node<f64, u8>> {
        Box::new(Node::Leaf { label })
    }

    fn make_tree() -> Node<f64, u8> {
        // [X0 < 5]
        //   [0]
        //   [X1 < 2]
        //     [1]
        //     [0]
        Node::Internal {
            feature: FeatureIndex::new(0),
            value: 5.0,
            left: leaf(0),
            right: Box::new(Node::Internal {
                feature: FeatureIndex::new(1),
                value: 2.0,
                left: leaf(1),
                right: leaf(0),
            }),
        }
    }

    #[test]
    fn leaf_counts() {
        let node = Node::<f64, u8>::Leaf { label: 1 };
        assert!(node.is_leaf());
        assert_eq!(node.n_nodes(), 1);
        assert_eq!(node.n_leaves(), 1);
        assert_eq!(node.depth(), 0);
    }

    #[test]
    fn nested_counts() {
        let tree = make_tree();
        assert!(!tree.is_leaf());
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
    }
}
