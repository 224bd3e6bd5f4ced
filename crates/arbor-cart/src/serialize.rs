//! Model serialization and deserialization via bincode.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::error::CartError;
use crate::predicate::Predicate;
use crate::tree::DecisionTree;

/// Current binary format version.
const FORMAT_VERSION: u32 = 2;

/// Versioned envelope for the serialized model.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope<T> {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Number of features the model was trained on.
    n_features: usize,
    /// Predicate kind the model applies.
    predicate: Predicate,
    /// The serialized tree.
    tree: T,
}

/// Leading fields of [`ModelEnvelope`], readable without knowing `V` or `L`.
#[derive(serde::Deserialize)]
struct ModelHeader {
    format_version: u32,
    n_features: usize,
    predicate: Predicate,
}

fn read_model_bytes(path: &Path) -> Result<Vec<u8>, CartError> {
    std::fs::read(path).map_err(|e| CartError::ReadModel {
        path: path.to_path_buf(),
        source: e,
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<T, CartError> {
    bincode::deserialize(bytes).map_err(|e| CartError::DeserializeModel {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decode the header and reject other format versions before the tree is
/// touched, since its layout may differ between versions.
fn read_header(bytes: &[u8], path: &Path) -> Result<ModelHeader, CartError> {
    let header: ModelHeader = decode(bytes, path)?;
    if header.format_version != FORMAT_VERSION {
        return Err(CartError::IncompatibleModelVersion {
            expected: FORMAT_VERSION,
            found: header.format_version,
            path: path.to_path_buf(),
        });
    }
    Ok(header)
}

/// Read the predicate kind a saved model was trained with.
///
/// Only the envelope header is decoded, so callers can pick the value type
/// to pass to [`DecisionTree::load`] before loading the tree itself.
///
/// # Errors
///
/// Same as [`DecisionTree::load`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn model_predicate(path: impl AsRef<Path>) -> Result<Predicate, CartError> {
    let path = path.as_ref();
    let bytes = read_model_bytes(path)?;
    let header = read_header(&bytes, path)?;
    debug!(n_features = header.n_features, predicate = %header.predicate, "model header read");
    Ok(header.predicate)
}

impl<V: Serialize, L: Serialize> DecisionTree<V, L> {
    /// Save the model to a binary file.
    ///
    /// Uses bincode encoding wrapped in a versioned envelope.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CartError::SerializeModel`] | bincode encoding failed |
    /// | [`CartError::WriteModel`] | file write failed |
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CartError> {
        let path = path.as_ref();

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_features: self.n_features,
            predicate: self.predicate,
            tree: self,
        };

        let bytes = bincode::serialize(&envelope)
            .map_err(|e| CartError::SerializeModel { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| CartError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            n_nodes = self.n_nodes(),
            "model saved"
        );

        Ok(())
    }
}

impl<V: DeserializeOwned, L: DeserializeOwned> DecisionTree<V, L> {
    /// Load a model from a binary file.
    ///
    /// The value and label types must match the ones the model was saved with.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CartError::ReadModel`] | file read failed |
    /// | [`CartError::DeserializeModel`] | bincode decoding failed |
    /// | [`CartError::IncompatibleModelVersion`] | format version mismatch |
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();

        let bytes = read_model_bytes(path)?;

        read_header(&bytes, path)?;
        let envelope: ModelEnvelope<Self> = decode(&bytes, path)?;

        debug!(
            n_features = envelope.n_features,
            predicate = %envelope.predicate,
            n_nodes = envelope.tree.n_nodes(),
            "model loaded"
        );

        Ok(envelope.tree)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{FORMAT_VERSION, ModelEnvelope, model_predicate};
    use crate::{CartError, DecisionTree, ErrorKind, Predicate, train};

    fn train_simple_model() -> DecisionTree<f64, String> {
        let rows = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![12.0, 0.0],
        ];
        let labels: Vec<String> = ["low", "low", "low", "high", "high", "high"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        train(&rows, &labels, 3, 1, Predicate::Threshold).unwrap()
    }

    #[test]
    fn round_trip_identical_predictions() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("test_model.bin");

        let tree = train_simple_model();
        tree.save(&model_path).unwrap();
        let loaded: DecisionTree<f64, String> = DecisionTree::load(&model_path).unwrap();

        assert_eq!(tree, loaded);
        for sample in [vec![1.5, 0.0], vec![11.0, 0.0], vec![5.0, 0.0]] {
            assert_eq!(
                tree.predict(&sample).unwrap(),
                loaded.predict(&sample).unwrap(),
                "predictions differ for sample {sample:?}"
            );
        }
    }

    #[test]
    fn load_nonexistent_file_error() {
        let dir = TempDir::new().unwrap();
        let err = DecisionTree::<f64, String>::load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, CartError::ReadModel { .. }));
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn load_corrupt_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"not a model").unwrap();
        let err = DecisionTree::<f64, String>::load(&path).unwrap_err();
        assert!(matches!(err, CartError::DeserializeModel { .. }));
    }

    #[test]
    fn load_future_version_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.bin");
        let tree = train_simple_model();
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION + 1,
            n_features: tree.n_features(),
            predicate: tree.predicate(),
            tree: &tree,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = DecisionTree::<f64, String>::load(&path).unwrap_err();
        assert!(matches!(
            err,
            CartError::IncompatibleModelVersion { found, .. } if found == FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn future_version_rejected_before_tree_decodes() {
        // Same header layout, but a body this build cannot decode.
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future_layout.bin");
        let mut bytes =
            bincode::serialize(&(FORMAT_VERSION + 1, 2usize, Predicate::Threshold)).unwrap();
        bytes.extend_from_slice(b"\xff\xff new tree layout");
        std::fs::write(&path, bytes).unwrap();

        let err = DecisionTree::<f64, String>::load(&path).unwrap_err();
        assert!(matches!(
            err,
            CartError::IncompatibleModelVersion { expected, found, .. }
                if expected == FORMAT_VERSION && found == FORMAT_VERSION + 1
        ));
        assert!(matches!(
            model_predicate(&path),
            Err(CartError::IncompatibleModelVersion { .. })
        ));
    }

    #[test]
    fn feature_names_survive_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("named.bin");
        let tree = train_simple_model()
            .with_feature_names(vec!["size".into(), "unused".into()])
            .unwrap();
        tree.save(&path).unwrap();
        let loaded: DecisionTree<f64, String> = DecisionTree::load(&path).unwrap();
        assert_eq!(loaded.feature_names().unwrap(), &["size", "unused"]);
        assert!(loaded.check_columns(&["unused", "size"]).is_err());
    }

    #[test]
    fn header_reports_predicate() {
        let dir = TempDir::new().unwrap();
        let rows = vec![vec!["a".to_string()], vec!["b".to_string()]];
        let labels = vec![0u8, 1u8];
        let tree = train(&rows, &labels, 2, 1, Predicate::Equality).unwrap();
        let path = dir.path().join("categorical.bin");
        tree.save(&path).unwrap();

        assert_eq!(model_predicate(&path).unwrap(), Predicate::Equality);
        let numeric_path = dir.path().join("numeric.bin");
        train_simple_model().save(&numeric_path).unwrap();
        assert_eq!(model_predicate(&numeric_path).unwrap(), Predicate::Threshold);
    }
}
