//! Error and warning types for dataset operations.
//!
//! Errors are structured values; their text is rendered from the fields
//! alone. Several messages are matched verbatim by callers, so the
//! templates below are part of the public interface.

use snapset_codec::CodecError;
use snapset_storage::StorageError;
use std::fmt;
use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// The dataset operation during which a wrapped failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `load()`.
    Load,
    /// `save()`.
    Save,
    /// `exists()`.
    Exists,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "Failed while loading data from data set",
            Self::Save => "Failed while saving data to data set",
            Self::Exists => "Failed during exists check for data set",
        })
    }
}

/// Fieldless view of [`DatasetError`] for matching on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetErrorKind {
    /// Invalid construction arguments.
    Configuration,
    /// No snapshot exists.
    NoVersionsFound,
    /// The requested snapshot does not exist.
    VersionNotFound,
    /// A versioned save would overwrite an existing snapshot.
    OverwriteRefused,
    /// The storage backend failed.
    Backend,
    /// The codec failed.
    Codec,
}

/// Errors raised by [`crate::VersionedDataset`].
///
/// Every variant carries `subject`, the dataset's diagnostic string.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Invalid construction arguments, reported before any I/O.
    #[error("Invalid configuration for {subject}: {message}")]
    Configuration {
        /// Dataset diagnostic string.
        subject: String,
        /// What is wrong.
        message: String,
    },

    /// Listing found no snapshots.
    #[error("Did not find any versions for {subject}")]
    NoVersionsFound {
        /// Dataset diagnostic string.
        subject: String,
    },

    /// The fixed load version does not exist.
    #[error("Did not find version `{version}` for {subject}")]
    VersionNotFound {
        /// Dataset diagnostic string.
        subject: String,
        /// The requested version.
        version: String,
    },

    /// The save path already holds a snapshot.
    #[error("Save path `{path}` for {subject} must not exist if versioning is enabled.")]
    OverwriteRefused {
        /// Dataset diagnostic string.
        subject: String,
        /// The physical path that exists.
        path: String,
    },

    /// A storage backend call failed.
    #[error("{operation} {subject}: {source}")]
    Backend {
        /// Operation in progress.
        operation: Operation,
        /// Dataset diagnostic string.
        subject: String,
        /// Backend failure.
        source: StorageError,
    },

    /// Encoding or decoding failed.
    #[error("{operation} {subject}: {source}")]
    Codec {
        /// Operation in progress.
        operation: Operation,
        /// Dataset diagnostic string.
        subject: String,
        /// Codec failure.
        source: CodecError,
    },
}

impl DatasetError {
    /// Returns the failure class.
    #[must_use]
    pub fn kind(&self) -> DatasetErrorKind {
        match self {
            Self::Configuration { .. } => DatasetErrorKind::Configuration,
            Self::NoVersionsFound { .. } => DatasetErrorKind::NoVersionsFound,
            Self::VersionNotFound { .. } => DatasetErrorKind::VersionNotFound,
            Self::OverwriteRefused { .. } => DatasetErrorKind::OverwriteRefused,
            Self::Backend { .. } => DatasetErrorKind::Backend,
            Self::Codec { .. } => DatasetErrorKind::Codec,
        }
    }

    /// Returns the diagnostic string of the dataset that failed.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::Configuration { subject, .. }
            | Self::NoVersionsFound { subject }
            | Self::VersionNotFound { subject, .. }
            | Self::OverwriteRefused { subject, .. }
            | Self::Backend { subject, .. }
            | Self::Codec { subject, .. } => subject,
        }
    }
}

/// Non-fatal conditions detected after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetWarning {
    /// A subsequent load would read a different snapshot than the one
    /// just written.
    PathMismatch {
        /// Physical path written.
        save_path: String,
        /// Physical path a load would read.
        load_path: String,
        /// Dataset diagnostic string.
        subject: String,
    },

    /// The snapshot just written could not be found by a load listing
    /// (eventually consistent stores, concurrent cleanup).
    NotVisible {
        /// Physical path written.
        save_path: String,
        /// Why the load path could not be resolved.
        reason: String,
        /// Dataset diagnostic string.
        subject: String,
    },
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathMismatch {
                save_path,
                load_path,
                subject,
            } => write!(
                f,
                "Save path `{save_path}` did not match load path `{load_path}` for {subject}"
            ),
            Self::NotVisible {
                save_path,
                reason,
                subject,
            } => write!(
                f,
                "Save path `{save_path}` for {subject} is not visible to load: {reason}"
            ),
        }
    }
}
