use std::hash::Hash;

use crate::error::CartError;
use crate::impurity::weighted_gini_by;
use crate::node::{FeatureIndex, Impurity};
use crate::predicate::Predicate;

/// Row indices routed to each side of a candidate split.
///
/// Every row of the searched set appears on exactly one side, in the same
/// relative order as the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    left: Vec<usize>,
    right: Vec<usize>,
}

impl Partition {
    /// Route each of `indices` by applying `predicate` to `rows[i][feature]`.
    pub(crate) fn by_predicate<V: PartialOrd>(
        rows: &[Vec<V>],
        indices: &[usize],
        feature: usize,
        value: &V,
        predicate: Predicate,
    ) -> Self {
        let (left, right) = indices
            .iter()
            .partition(|&&i| predicate.goes_left(&rows[i][feature], value));
        Self { left, right }
    }

    /// Row indices routed left.
    #[must_use]
    pub fn left(&self) -> &[usize] {
        &self.left
    }

    /// Row indices routed right.
    #[must_use]
    pub fn right(&self) -> &[usize] {
        &self.right
    }

    /// Number of rows routed left.
    #[must_use]
    pub fn n_left(&self) -> usize {
        self.left.len()
    }

    /// Number of rows routed right.
    #[must_use]
    pub fn n_right(&self) -> usize {
        self.right.len()
    }

    /// `true` when one side received every row.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.left.is_empty() || self.right.is_empty()
    }

    pub(crate) fn into_sides(self) -> (Vec<usize>, Vec<usize>) {
        (self.left, self.right)
    }

    fn score<L: Eq + Hash>(&self, labels: &[L]) -> Impurity {
        weighted_gini_by(
            self.left.iter().map(|&i| &labels[i]),
            self.left.len(),
            self.right.iter().map(|&i| &labels[i]),
            self.right.len(),
        )
    }
}

/// The best `(feature, value)` split found for a set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate<V> {
    pub(crate) feature: FeatureIndex,
    pub(crate) value: V,
    pub(crate) partition: Partition,
    pub(crate) impurity: Impurity,
}

impl<V> SplitCandidate<V> {
    /// Feature column the split reads.
    #[must_use]
    pub fn feature(&self) -> FeatureIndex {
        self.feature
    }

    /// Training value the split compares against.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Rows routed to each side.
    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Weighted Gini impurity of the partition.
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        self.impurity
    }
}

/// Check that `rows` is a non-empty rectangular table with one label per row
/// and at least one feature column. Returns the number of feature columns.
pub(crate) fn validate_dataset<V, L>(rows: &[Vec<V>], labels: &[L]) -> Result<usize, CartError> {
    let first = rows.first().ok_or(CartError::EmptyDataset)?;
    if labels.len() != rows.len() {
        return Err(CartError::LabelCountMismatch {
            rows: rows.len(),
            labels: labels.len(),
        });
    }
    let n_features = first.len();
    if n_features == 0 {
        return Err(CartError::ZeroFeatures);
    }
    if let Some((row_index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != n_features)
    {
        return Err(CartError::FeatureCountMismatch {
            expected: n_features,
            got: row.len(),
            row_index,
        });
    }
    Ok(n_features)
}

/// Find the split with the lowest weighted Gini impurity over every
/// `(feature, value)` pair present in `rows`.
///
/// Candidate values are exactly the training values. Candidates are visited
/// feature-ascending, then row-ascending, and a later candidate only wins by
/// scoring strictly lower, so ties resolve to the first one visited.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`CartError::EmptyDataset`] | `rows` is empty |
/// | [`CartError::LabelCountMismatch`] | `labels.len() != rows.len()` |
/// | [`CartError::ZeroFeatures`] | rows have no columns |
/// | [`CartError::FeatureCountMismatch`] | rows have inconsistent widths |
pub fn find_best_split<V, L>(
    rows: &[Vec<V>],
    labels: &[L],
    predicate: Predicate,
) -> Result<SplitCandidate<V>, CartError>
where
    V: Clone + PartialOrd,
    L: Eq + Hash,
{
    let n_features = validate_dataset(rows, labels)?;
    let indices: Vec<usize> = (0..rows.len()).collect();
    search(rows, labels, &indices, n_features, predicate).ok_or(CartError::ZeroFeatures)
}

/// Exhaustive split search over the rows named by `indices`.
///
/// Returns `None` only when there is nothing to try (no rows or no features).
pub(crate) fn search<V, L>(
    rows: &[Vec<V>],
    labels: &[L],
    indices: &[usize],
    n_features: usize,
    predicate: Predicate,
) -> Option<SplitCandidate<V>>
where
    V: Clone + PartialOrd,
    L: Eq + Hash,
{
    (0..n_features)
        .flat_map(|feature| indices.iter().map(move |&row| (feature, row)))
        .fold(None, |best: Option<SplitCandidate<V>>, (feature, row)| {
            let value = &rows[row][feature];
            let partition = Partition::by_predicate(rows, indices, feature, value, predicate);
            let impurity = partition.score(labels);
            match best {
                Some(best) if best.impurity <= impurity => Some(best),
                _ => Some(SplitCandidate {
                    feature: FeatureIndex::new(feature),
                    value: value.clone(),
                    partition,
                    impurity,
                }),
            }
        })
}
