//! In-memory storage backend.

use crate::backend::{StorageBackend, WriteMode};
use crate::error::{StorageError, StorageResult};
use crate::path;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// An in-memory storage backend with a flat key space.
///
/// Keys are normalised paths and there are no directory entries: a
/// "directory" exists exactly when some key lives under it, the way cloud
/// object stores behave. This makes it suitable for:
/// - Unit and integration tests
/// - Exercising object-store semantics without a network
/// - Ephemeral datasets that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use snapset_storage::{InMemoryBackend, StorageBackend, WriteMode};
///
/// let backend = InMemoryBackend::with_bucket("models");
/// backend.write_bytes("a/b.bin", b"x", WriteMode::CreateNew).unwrap();
/// assert!(backend.exists("a").unwrap());
/// assert_eq!(backend.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    bucket: Option<String>,
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that reports a bucket name in diagnostics.
    #[must_use]
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Returns all stored keys in order.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }

    /// Removes every object.
    pub fn clear(&self) {
        self.objects.write().clear();
    }
}

impl StorageBackend for InMemoryBackend {
    fn kind(&self) -> Cow<'static, str> {
        Cow::Borrowed("Memory")
    }

    fn describe(&self) -> Vec<(String, String)> {
        self.bucket
            .iter()
            .map(|bucket| ("bucket_name".to_string(), bucket.clone()))
            .collect()
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        let key = path::normalize(path)?;
        let objects = self.objects.read();
        if key.is_empty() {
            return Ok(!objects.is_empty());
        }
        if objects.contains_key(&key) {
            return Ok(true);
        }
        let prefix = format!("{key}/");
        Ok(objects
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix)))
    }

    fn list_children(&self, path: &str) -> StorageResult<Vec<String>> {
        let key = path::normalize(path)?;
        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        };

        let objects = self.objects.read();
        let mut children: Vec<String> = Vec::new();
        for (name, _) in objects.range(prefix.clone()..) {
            let Some(rest) = name.strip_prefix(prefix.as_str()) else {
                break;
            };
            let child = rest.split('/').next().unwrap_or(rest);
            children.push(child.to_string());
        }
        // "v1.5/.." sorts before "v1/.." byte-wise, so order by name here.
        children.sort();
        children.dedup();

        if children.is_empty() {
            return Err(StorageError::not_found(path));
        }
        Ok(children)
    }

    fn read_bytes(&self, path: &str) -> StorageResult<Vec<u8>> {
        let key = path::normalize(path)?;
        self.objects
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))
    }

    fn write_bytes(&self, path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()> {
        let key = path::normalize(path)?;
        if key.is_empty() {
            return Err(StorageError::invalid_path(path, "empty object key"));
        }

        let mut objects = self.objects.write();
        if mode == WriteMode::CreateNew && objects.contains_key(&key) {
            return Err(StorageError::already_exists(path));
        }
        objects.insert(key, data.to_vec());
        Ok(())
    }
}
