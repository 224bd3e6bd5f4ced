//! Majority vote over leaf labels.

use std::collections::HashMap;
use std::hash::Hash;

/// Return the most frequent label, or `None` for an empty input.
///
/// On a frequency tie the label that appears first in `labels` wins, so
/// `[5, 5, 7, 7]` votes `5`.
pub fn majority_label<'a, L, I>(labels: I) -> Option<&'a L>
where
    L: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let ordered: Vec<&L> = labels.into_iter().collect();
    let mut counts: HashMap<&L, usize> = HashMap::new();
    for &label in &ordered {
        *counts.entry(label).or_insert(0) += 1;
    }
    let max = counts.values().copied().max()?;
    ordered.into_iter().find(|label| counts[label] == max)
}
