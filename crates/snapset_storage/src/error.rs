//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The path (or the parent being listed) does not exist.
    #[error("no such path: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },

    /// A create-only write hit an existing path.
    #[error("path already exists: {path}")]
    AlreadyExists {
        /// The existing path.
        path: String,
    },

    /// The path cannot be used with this backend.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        /// The path being accessed.
        path: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Encryption or decryption failed.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// The backend could not serve the request (service down, session closed).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Creates a not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an already exists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an I/O error, mapping `NotFound` and `AlreadyExists` to their
    /// dedicated variants.
    pub fn from_io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Returns true if the error means the resource is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
