//! Batch prediction and evaluation for a fitted tree.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::CartError;
use crate::tree::DecisionTree;

impl<V, L> DecisionTree<V, L>
where
    V: PartialOrd + Sync,
    L: Sync,
{
    /// Predict class labels for a batch of samples in parallel.
    ///
    /// Output order matches `samples`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::FeatureIndexOutOfRange`] if any sample is too
    /// short for a split on its path.
    pub fn predict_batch(&self, samples: &[Vec<V>]) -> Result<Vec<&L>, CartError> {
        samples
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }
}

impl<V, L> DecisionTree<V, L>
where
    V: PartialOrd + Sync,
    L: PartialEq + Sync,
{
    /// Proportion of `rows` whose predicted label equals the paired label.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CartError::EmptyDataset`] | `rows` is empty |
    /// | [`CartError::LabelCountMismatch`] | `labels.len() != rows.len()` |
    /// | [`CartError::FeatureIndexOutOfRange`] | a row is too short for its path |
    pub fn accuracy(&self, rows: &[Vec<V>], labels: &[L]) -> Result<f64, CartError> {
        if rows.is_empty() {
            return Err(CartError::EmptyDataset);
        }
        if rows.len() != labels.len() {
            return Err(CartError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        let predictions = self.predict_batch(rows)?;
        prediction_accuracy(&predictions, labels)
    }
}

/// Proportion of `predicted` labels equal to the paired entry of `labels`.
///
/// Use this when the predictions are already in hand, for example from
/// [`DecisionTree::predict_batch`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`CartError::EmptyDataset`] | `predicted` is empty |
/// | [`CartError::LabelCountMismatch`] | `labels.len() != predicted.len()` |
pub fn prediction_accuracy<L: PartialEq>(predicted: &[&L], labels: &[L]) -> Result<f64, CartError> {
    if predicted.is_empty() {
        return Err(CartError::EmptyDataset);
    }
    if predicted.len() != labels.len() {
        return Err(CartError::LabelCountMismatch {
            rows: predicted.len(),
            labels: labels.len(),
        });
    }
    let correct = predicted
        .iter()
        .zip(labels)
        .filter(|&(&p, l)| p == l)
        .count();
    Ok(correct as f64 / predicted.len() as f64)
}
