//! JSON writer for prediction outputs.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument};

use crate::IoError;

#[derive(Serialize)]
struct PredictionEntry<'a> {
    row: usize,
    label: &'a str,
}

#[derive(Serialize)]
struct PredictionsJson<'a> {
    n_samples: usize,
    predictions: Vec<PredictionEntry<'a>>,
}

/// Write one predicted label per input row to `path` as pretty JSON.
///
/// Creates the parent directory if it does not exist.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::Serialize`] | JSON encoding failed |
/// | [`IoError::WriteFile`] | directory creation or file write failed |
#[instrument(skip_all, fields(path = %path.display(), n = labels.len()))]
pub fn write_predictions<S: AsRef<str>>(path: &Path, labels: &[S]) -> Result<(), IoError> {
    let output = PredictionsJson {
        n_samples: labels.len(),
        predictions: labels
            .iter()
            .enumerate()
            .map(|(row, label)| PredictionEntry {
                row,
                label: label.as_ref(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| IoError::WriteFile {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("predictions written");
    Ok(())
}
