//! Indented text dump of a fitted tree.

use std::fmt;

use crate::node::Node;
use crate::predicate::Predicate;
use crate::tree::DecisionTree;

impl<V: fmt::Display, L: fmt::Display> DecisionTree<V, L> {
    /// Render the tree as indented text, one node per line.
    ///
    /// Internal nodes print as `[X{feature} = value]` (equality) or
    /// `[X{feature} < value]` (threshold) followed by their left then right
    /// subtree, indented two spaces deeper. Leaves print as `[label]`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_node<V: fmt::Display, L: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<V, L>,
    predicate: Predicate,
    depth: usize,
) -> fmt::Result {
    let indent = depth * 2;
    match node {
        Node::Leaf { label } => writeln!(f, "{:indent$}[{label}]", ""),
        Node::Internal {
            feature,
            value,
            left,
            right,
        } => {
            writeln!(f, "{:indent$}[X{feature} {} {value}]", "", predicate.symbol())?;
            write_node(f, left, predicate, depth + 1)?;
            write_node(f, right, predicate, depth + 1)
        }
    }
}

impl<V: fmt::Display, L: fmt::Display> fmt::Display for DecisionTree<V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &self.root, self.predicate, 0)
    }
}
