use std::path::PathBuf;

/// Broad classification of a [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a dataset or configuration the builder cannot use.
    InvalidInput,
    /// A prediction sample is narrower than a feature index the tree needs.
    IndexOutOfRange,
    /// Reading or writing a model file failed.
    Persistence,
}

/// Errors from decision tree training, prediction, and persistence.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Returned when the training dataset has zero rows.
    #[error("training dataset has zero rows")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when the number of labels differs from the number of rows.
    #[error("dataset has {rows} rows but {labels} labels")]
    LabelCountMismatch {
        /// Number of feature rows.
        rows: usize,
        /// Number of labels.
        labels: usize,
    },

    /// Returned when a row has a different width than the first row.
    #[error("row {row_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
        /// Zero-based index of the offending row.
        row_index: usize,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// A column list has a different width than the tree was trained on.
    #[error("got {got} feature columns, the tree was trained on {expected}")]
    ColumnCountMismatch {
        /// Number of feature columns the tree was trained on.
        expected: usize,
        /// Number of columns supplied.
        got: usize,
    },

    /// A column name differs from the training header at the same position.
    #[error("feature column {position} is \"{got}\", the tree was trained with \"{expected}\"")]
    ColumnNameMismatch {
        /// Zero-based column position.
        position: usize,
        /// Name recorded at training time.
        expected: String,
        /// Name supplied.
        got: String,
    },

    /// Returned when a sample is too short for a split the tree applies to it.
    #[error("sample has {sample_len} features, but a split reads feature {feature}")]
    FeatureIndexOutOfRange {
        /// Feature index the visited node reads.
        feature: usize,
        /// Length of the sample passed to prediction.
        sample_len: usize,
    },

    /// bincode could not encode the tree.
    #[error("failed to encode model")]
    SerializeModel {
        source: Box<bincode::ErrorKind>,
    },

    /// The file exists but does not decode as a model envelope, or the value
    /// and label types requested do not match the ones it was saved with.
    #[error("failed to decode model from {path}")]
    DeserializeModel {
        path: PathBuf,
        source: Box<bincode::ErrorKind>,
    },

    #[error("failed to write model to {path}")]
    WriteModel {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read model from {path}")]
    ReadModel {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The envelope was written by a different model format version.
    #[error("model {path} has format version {found}, this build reads version {expected}")]
    IncompatibleModelVersion {
        expected: u32,
        found: u32,
        path: PathBuf,
    },
}

impl CartError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::EmptyDataset
            | CartError::ZeroFeatures
            | CartError::LabelCountMismatch { .. }
            | CartError::FeatureCountMismatch { .. }
            | CartError::InvalidMaxDepth { .. }
            | CartError::ColumnCountMismatch { .. }
            | CartError::ColumnNameMismatch { .. } => ErrorKind::InvalidInput,
            CartError::FeatureIndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            CartError::SerializeModel { .. }
            | CartError::DeserializeModel { .. }
            | CartError::WriteModel { .. }
            | CartError::ReadModel { .. }
            | CartError::IncompatibleModelVersion { .. } => ErrorKind::Persistence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CartError, ErrorKind};

    #[test]
    fn input_errors_are_invalid_input() {
        assert_eq!(CartError::EmptyDataset.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            CartError::LabelCountMismatch { rows: 3, labels: 2 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CartError::InvalidMaxDepth { max_depth: 0 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CartError::ColumnCountMismatch { expected: 4, got: 5 }.kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn narrow_sample_is_index_out_of_range() {
        let err = CartError::FeatureIndexOutOfRange {
            feature: 3,
            sample_len: 2,
        };
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(
            err.to_string(),
            "sample has 2 features, but a split reads feature 3"
        );
    }
}
