//! Test fixtures and dataset helpers.
//!
//! Provides backends with automatic cleanup and a small serde record type
//! to push through the codecs.

use serde::{Deserialize, Serialize};
use snapset_codec::{JsonCodec, TextCodec};
use snapset_core::{DatasetConfig, Version, VersionedDataset};
use snapset_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// First version used throughout the fixtures.
pub const V1: &str = "2019-01-01T23.59.59.999Z";

/// A version one millisecond after [`V1`].
pub const V2: &str = "2019-01-02T00.00.00.000Z";

/// A backend handle shared between datasets.
pub type SharedBackend = Arc<dyn StorageBackend>;

/// Dataset of [`Frame`] values stored as JSON.
pub type FrameDataset = VersionedDataset<SharedBackend, JsonCodec<Frame>>;

/// Dataset of strings stored as UTF-8 text.
pub type TextDataset = VersionedDataset<SharedBackend, TextCodec>;

/// A tiny table: column names and integer rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Column names.
    pub columns: Vec<String>,
    /// Rows, one value per column.
    pub rows: Vec<Vec<i64>>,
}

/// Returns a fixed two-column frame.
pub fn sample_frame() -> Frame {
    Frame {
        columns: vec!["col1".to_string(), "col2".to_string()],
        rows: vec![vec![1, 4], vec![2, 5], vec![3, 6]],
    }
}

/// Returns a frame different from [`sample_frame`].
pub fn other_frame() -> Frame {
    Frame {
        columns: vec!["col1".to_string()],
        rows: vec![vec![42]],
    }
}

/// Configuration with versioning enabled and the given fixed versions.
pub fn versioned(load: Option<&str>, save: Option<&str>) -> DatasetConfig {
    DatasetConfig::new().version(Version::new(
        load.map(str::to_string),
        save.map(str::to_string),
    ))
}

/// A storage backend kept alive for the duration of a test.
pub struct TestStore {
    /// The backend handle.
    pub backend: SharedBackend,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates an in-memory store.
    pub fn memory() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
            temp_dir: None,
        }
    }

    /// Creates a store on a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let backend = FileBackend::open(temp_dir.path()).expect("Failed to open file backend");
        Self {
            backend: Arc::new(backend),
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the root directory if file-based, None if in-memory.
    pub fn root(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Returns a new handle to the backend.
    pub fn handle(&self) -> SharedBackend {
        Arc::clone(&self.backend)
    }

    /// Builds a JSON [`Frame`] dataset over this store.
    pub fn json_dataset(&self, filepath: &str, config: DatasetConfig) -> FrameDataset {
        VersionedDataset::new(filepath, self.handle(), JsonCodec::new(), config)
            .expect("Failed to create dataset")
    }

    /// Builds a text dataset over this store.
    pub fn text_dataset(&self, filepath: &str, config: DatasetConfig) -> TextDataset {
        VersionedDataset::new(filepath, self.handle(), TextCodec, config)
            .expect("Failed to create dataset")
    }
}

/// Runs a test with an in-memory store.
pub fn with_memory_store<F, R>(f: F) -> R
where
    F: FnOnce(&TestStore) -> R,
{
    f(&TestStore::memory())
}

/// Runs a test with a temp-dir store. The directory is removed afterwards.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&TestStore) -> R,
{
    f(&TestStore::file())
}

/// Runs a test once against every backend kind.
///
/// # Example
///
/// ```rust
/// use snapset_testkit::{for_each_store, versioned};
///
/// for_each_store(|store| {
///     let dataset = store.text_dataset("a.txt", versioned(None, None));
///     assert!(!dataset.exists().unwrap());
/// });
/// ```
pub fn for_each_store<F>(mut f: F)
where
    F: FnMut(&TestStore),
{
    with_memory_store(&mut f);
    with_file_store(&mut f);
}
