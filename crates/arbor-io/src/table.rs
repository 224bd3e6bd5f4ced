//! In-memory labeled table produced by [`TableReader`](crate::TableReader).

use crate::IoError;

/// Feature rows read from CSV, with an optional label per row.
///
/// Cells are kept as raw strings: categorical trees use them directly and
/// numeric trees convert them with [`Table::numeric_rows`].
#[derive(Debug, Clone)]
pub struct Table {
    /// Feature column names from the CSV header, label column excluded.
    feature_names: Vec<String>,
    /// Raw feature cells: `rows[sample_index][feature_index]`.
    rows: Vec<Vec<String>>,
    /// One label per row when the table has a label column.
    labels: Option<Vec<String>>,
}

impl Table {
    pub(crate) fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<String>>,
        labels: Option<Vec<String>>,
    ) -> Self {
        Self {
            feature_names,
            rows,
            labels,
        }
    }

    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the raw feature rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Return the labels, if the table was read with a label column.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Return the number of data rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Parse every feature cell as a finite `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::NonNumericValue`] for the first cell that does not
    /// parse or is NaN / infinite.
    pub fn numeric_rows(&self) -> Result<Vec<Vec<f64>>, IoError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                row.iter()
                    .zip(&self.feature_names)
                    .map(|(raw, column)| {
                        raw.trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite())
                            .ok_or_else(|| IoError::NonNumericValue {
                                row_index,
                                column: column.clone(),
                                raw: raw.clone(),
                            })
                    })
                    .collect::<Result<Vec<f64>, IoError>>()
            })
            .collect()
    }
}
