//! Error types raised by the JSON file store.

use std::path::PathBuf;

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`JsonStoreError`] failures.
pub type JsonStoreResult<T> = Result<T, JsonStoreError>;

/// Failures that can occur while reading or writing the league document.
#[derive(Debug, Error)]
pub enum JsonStoreError {
    /// The document exists but could not be read.
    #[error("failed to read league document `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not a valid league snapshot.
    #[error("failed to decode league document `{}`", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Serializing the snapshot failed.
    #[error("failed to encode league document")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    /// Writing or renaming the document failed.
    #[error("failed to write league document `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The data directory is missing or not a directory.
    #[error("data directory `{}` is not usable", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<JsonStoreError> for StorageError {
    fn from(err: JsonStoreError) -> Self {
        match err {
            JsonStoreError::Decode { .. } => StorageError::corrupt(err.to_string(), err),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
