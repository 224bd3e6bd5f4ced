//! CSV table reader with full input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::table::Table;

/// Which CSV column holds the class label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelColumn {
    /// The right-most column.
    #[default]
    Last,
    /// The column with this header name.
    Named(String),
    /// No label column; every column is a feature.
    Absent,
}

/// Reads a labeled (or unlabeled) feature table from a CSV file.
///
/// Expected CSV format:
/// - Header row required
/// - `feature1,feature2,...,featureN,label` (label position configurable)
/// - All rows must have the same number of columns as the header
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingLabelColumn`] | Named label column not in header |
/// | [`IoError::NoFeatureColumns`] | No columns left besides the label |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct TableReader {
    path: PathBuf,
    label: LabelColumn,
}

impl TableReader {
    /// Create a new reader for the given CSV file path, labels in the last column.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            label: LabelColumn::Last,
        }
    }

    /// Set which column holds the label.
    #[must_use]
    pub fn with_label_column(mut self, label: LabelColumn) -> Self {
        self.label = label;
        self
    }

    /// Read and validate the CSV file, returning a [`Table`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Table, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets our own InconsistentRowLength check fire instead
        // of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let label_index = match &self.label {
            LabelColumn::Last => expected_cols.checked_sub(1),
            LabelColumn::Named(name) => Some(
                header
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| IoError::MissingLabelColumn {
                        path: self.path.clone(),
                        column: name.clone(),
                    })?,
            ),
            LabelColumn::Absent => None,
        };

        let feature_names: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|&(i, _)| Some(i) != label_index)
            .map(|(_, h)| h.to_string())
            .collect();
        if feature_names.is_empty() {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Vec::with_capacity(feature_names.len());
            for (col_index, cell) in record.iter().enumerate() {
                if Some(col_index) == label_index {
                    labels.push(cell.to_string());
                } else {
                    row.push(cell.to_string());
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_samples = rows.len(),
            n_features = feature_names.len(),
            labeled = label_index.is_some(),
            "table loaded"
        );

        let labels = label_index.map(|_| labels);
        Ok(Table::new(feature_names, rows, labels))
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
