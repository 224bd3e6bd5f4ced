//! Gini impurity of label groups.

use std::collections::HashMap;
use std::hash::Hash;

use crate::node::Impurity;

/// Count occurrences of each label.
fn class_counts<'a, L, I>(labels: I) -> HashMap<&'a L, usize>
where
    L: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let mut counts = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }
    counts
}

/// Gini impurity `1 - Σ(p_c²)` of a group from its class counts.
///
/// Classes absent from the group contribute `p_c = 0`, so the sum only needs
/// the classes actually present. The squares are summed as integers so the
/// result does not depend on map iteration order.
fn gini_from_counts<L>(counts: &HashMap<&L, usize>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let sum_sq: usize = counts.values().map(|&c| c * c).sum();
    1.0 - sum_sq as f64 / (n as f64 * n as f64)
}

/// Gini impurity of a single label group. Returns 0.0 for an empty group.
#[must_use]
pub fn gini<L: Eq + Hash>(labels: &[L]) -> Impurity {
    Impurity::new(gini_from_counts(&class_counts(labels), labels.len()))
}

/// Weighted Gini impurity of a two-sided partition.
///
/// Each non-empty side contributes its own Gini impurity weighted by its
/// share of the combined row count. Empty sides contribute nothing, and two
/// empty sides score 0.0.
#[must_use]
pub fn weighted_gini<L: Eq + Hash>(left: &[L], right: &[L]) -> Impurity {
    weighted_gini_by(left.iter(), left.len(), right.iter(), right.len())
}

/// [`weighted_gini`] over borrowed label iterators, used by the split search
/// to score index partitions without collecting labels.
pub(crate) fn weighted_gini_by<'a, L, I, J>(
    left: I,
    n_left: usize,
    right: J,
    n_right: usize,
) -> Impurity
where
    L: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a L>,
    J: IntoIterator<Item = &'a L>,
{
    let total = n_left + n_right;
    if total == 0 {
        return Impurity::new(0.0);
    }
    let total = total as f64;
    let weighted = |counts: HashMap<&L, usize>, n: usize| {
        if n == 0 {
            0.0
        } else {
            gini_from_counts(&counts, n) * (n as f64 / total)
        }
    };
    let value = weighted(class_counts(left), n_left) + weighted(class_counts(right), n_right);
    Impurity::new(value)
}
