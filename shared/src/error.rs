use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`crate::store::ContentStore`] implementations and the
/// category catalog.
///
/// Missing files are not errors: loaders return `Ok(None)` and deletes return
/// `Ok(false)`. Reads replace malformed sidecars with defaults; edits refuse
/// to overwrite them and return [`StoreError::Malformed`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record or category does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied incomplete or malformed input.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// A record or category with the same slug already exists.
    #[error("already exists: {0}")]
    Conflict(String),

    /// Filesystem failure while reading or writing `path`.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// File or directory the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file on disk could not be parsed, so it was not rewritten.
    #[error("malformed {}: {source}", path.display())]
    Malformed {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Remote store request failed or returned an unexpected status.
    #[error("http error: {0}")]
    Http(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Convenience alias used throughout the store layer.
pub type StoreResult<T> = Result<T, StoreError>;
