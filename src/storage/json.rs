//! Flat-file persistence for the record collections.
//!
//! Each collection is one JSON file holding an ordered list of flat
//! objects. A missing file is created containing `[]` and treated as an
//! empty collection; an empty file is repaired the same way. Anything else
//! that fails to parse is corruption and is reported rather than guessed
//! at. Saves go through a sibling temp file and an atomic rename so a
//! failed write never leaves a half-written collection behind.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

/// Errors reading a collection file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file exists but could not be read.
    #[error("could not read file '{path}': {source}")]
    Io {
        /// The collection file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The file content is not a valid collection.
    #[error("file '{path}' is corrupted: {reason}")]
    Corruption {
        /// The collection file.
        path: PathBuf,
        /// What was wrong with the content.
        reason: String,
    },
}

/// Errors writing a collection file.
#[derive(Debug, thiserror::Error)]
#[error("could not write file '{path}': {source}")]
pub struct SaveError {
    /// The collection file.
    path: PathBuf,
    /// The underlying error.
    #[source]
    source: io::Error,
}

/// Loads an ordered list of records from `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read or initialized,
/// and [`LoadError::Corruption`] when it holds invalid JSON, a non-array
/// root, or a non-object element.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.exists() {
        initialize_empty(path)?;
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if raw.trim().is_empty() {
        // An empty file is repaired to an empty collection.
        initialize_empty(path)?;
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| LoadError::Corruption {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        })?;

    let Some(items) = value.as_array() else {
        return Err(LoadError::Corruption {
            path: path.to_path_buf(),
            reason: "expected a JSON list (e.g. [])".to_string(),
        });
    };

    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(LoadError::Corruption {
            path: path.to_path_buf(),
            reason: format!("entry at index {index} is not an object"),
        });
    }

    serde_json::from_value(value).map_err(|e| LoadError::Corruption {
        path: path.to_path_buf(),
        reason: format!("unexpected record shape: {e}"),
    })
}

/// Saves an ordered list of records to `path`, replacing the whole file.
///
/// # Errors
///
/// Returns [`SaveError`] when the temp file cannot be written or moved into
/// place; the original file is left untouched in that case.
pub fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SaveError {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let content = serde_json::to_string_pretty(records).map_err(|e| SaveError {
        path: path.to_path_buf(),
        source: io::Error::other(e),
    })?;

    let tmp = tmp_path(path);
    let write_and_swap = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path));

    write_and_swap.map_err(|source| {
        let _ = fs::remove_file(&tmp);
        SaveError {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn initialize_empty(path: &Path) -> Result<(), LoadError> {
    save_records::<serde_json::Value>(path, &[]).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: io::Error::other(e),
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
