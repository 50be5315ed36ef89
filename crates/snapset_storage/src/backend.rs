//! Storage backend trait definition.

use crate::error::StorageResult;
use std::borrow::Cow;

/// How a write treats an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Fail with [`crate::StorageError::AlreadyExists`] if the path exists.
    #[default]
    CreateNew,
    /// Replace whatever is stored at the path.
    Overwrite,
}

/// A storage medium for dataset snapshots.
///
/// Storage backends are **opaque byte stores** keyed by `/`-separated
/// paths. Snapset owns path layout and versioning; backends only move
/// bytes.
///
/// # Invariants
///
/// - `read_bytes` returns exactly the bytes last written at that path
/// - `list_children` returns the direct child names of a path, sorted,
///   and fails with [`crate::StorageError::NotFound`] when the path has no
///   children and does not exist, so callers can tell "missing" from "broken"
/// - `write_bytes` with [`WriteMode::CreateNew`] never replaces data
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - Object-store style flat key space
/// - [`super::FileBackend`] - Local disk
/// - [`super::EncryptedBackend`] - Encryption wrapper over another backend
pub trait StorageBackend: Send + Sync {
    /// Short name of the storage medium, used in dataset type names
    /// (`"Local"`, `"Memory"`, ...). Wrappers may derive theirs from the
    /// inner backend's.
    fn kind(&self) -> Cow<'static, str>;

    /// Backend-specific configuration shown in dataset diagnostics.
    ///
    /// Pairs are rendered as `key=value`; secrets must never appear here.
    fn describe(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Returns whether something is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer (permissions, I/O).
    fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Lists the direct child names under `path`, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `path` does not exist, or another error if
    /// the listing fails.
    fn list_children(&self, path: &str) -> StorageResult<Vec<String>>;

    /// Reads all bytes stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing is stored at `path`.
    fn read_bytes(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Writes `data` at `path`, creating intermediate levels as needed.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` when `mode` is [`WriteMode::CreateNew`] and
    /// the path is taken, or an I/O error.
    fn write_bytes(&self, path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    fn kind(&self) -> Cow<'static, str> {
        (**self).kind()
    }

    fn describe(&self) -> Vec<(String, String)> {
        (**self).describe()
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        (**self).exists(path)
    }

    fn list_children(&self, path: &str) -> StorageResult<Vec<String>> {
        (**self).list_children(path)
    }

    fn read_bytes(&self, path: &str) -> StorageResult<Vec<u8>> {
        (**self).read_bytes(path)
    }

    fn write_bytes(&self, path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()> {
        (**self).write_bytes(path, data, mode)
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn kind(&self) -> Cow<'static, str> {
        (**self).kind()
    }

    fn describe(&self) -> Vec<(String, String)> {
        (**self).describe()
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        (**self).exists(path)
    }

    fn list_children(&self, path: &str) -> StorageResult<Vec<String>> {
        (**self).list_children(path)
    }

    fn read_bytes(&self, path: &str) -> StorageResult<Vec<u8>> {
        (**self).read_bytes(path)
    }

    fn write_bytes(&self, path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()> {
        (**self).write_bytes(path, data, mode)
    }
}
