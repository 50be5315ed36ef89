//! Failure injection for storage backends.

use parking_lot::Mutex;
use snapset_storage::{StorageBackend, StorageError, StorageResult, WriteMode};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A backend call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `exists`
    Exists,
    /// `list_children`
    List,
    /// `read_bytes`
    Read,
    /// `write_bytes`
    Write,
}

/// Wraps a backend and fails selected calls with
/// [`StorageError::Unavailable`].
///
/// Failures are never `NotFound`, so callers must treat them as errors
/// rather than as "missing".
#[derive(Debug)]
pub struct FaultyBackend<B> {
    inner: B,
    failing: Mutex<HashSet<FailPoint>>,
    injected: AtomicUsize,
}

impl<B: StorageBackend> FaultyBackend<B> {
    /// Wraps `inner` with no failures armed.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            injected: AtomicUsize::new(0),
        }
    }

    /// Makes every later call at `point` fail.
    pub fn fail(&self, point: FailPoint) {
        self.failing.lock().insert(point);
    }

    /// Stops failing calls at `point`.
    pub fn heal(&self, point: FailPoint) {
        self.failing.lock().remove(&point);
    }

    /// Number of failures injected so far.
    pub fn injected(&self) -> usize {
        self.injected.load(Ordering::SeqCst)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn check(&self, point: FailPoint) -> StorageResult<()> {
        if self.failing.lock().contains(&point) {
            self.injected.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::Unavailable(format!("injected {point:?} failure")));
        }
        Ok(())
    }
}

impl<B: StorageBackend> StorageBackend for FaultyBackend<B> {
    fn kind(&self) -> Cow<'static, str> {
        self.inner.kind()
    }

    fn describe(&self) -> Vec<(String, String)> {
        self.inner.describe()
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        self.check(FailPoint::Exists)?;
        self.inner.exists(path)
    }

    fn list_children(&self, path: &str) -> StorageResult<Vec<String>> {
        self.check(FailPoint::List)?;
        self.inner.list_children(path)
    }

    fn read_bytes(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.check(FailPoint::Read)?;
        self.inner.read_bytes(path)
    }

    fn write_bytes(&self, path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()> {
        self.check(FailPoint::Write)?;
        self.inner.write_bytes(path, data, mode)
    }
}
