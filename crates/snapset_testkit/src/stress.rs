//! Concurrent save helpers.
//!
//! Each writer gets its own dataset instance over a shared backend, the way
//! independent pipeline runs would.

use crate::fixtures::{Frame, TestStore};
use crate::versioned;
use snapset_core::{DatasetErrorKind, SaveOutcome};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a concurrent save run.
#[derive(Debug)]
pub struct StressTestResult {
    /// Successful saves.
    pub saved: Vec<SaveOutcome>,
    /// Failed saves, by error kind.
    pub failed: Vec<DatasetErrorKind>,
    /// Total duration.
    pub duration: Duration,
}

impl StressTestResult {
    /// Number of failures of the given kind.
    pub fn failures_of(&self, kind: DatasetErrorKind) -> usize {
        self.failed.iter().filter(|k| **k == kind).count()
    }
}

/// Saves `frame` from one thread per entry in `versions`, each thread
/// using that entry as its fixed save version.
pub fn concurrent_saves(
    store: &TestStore,
    filepath: &str,
    versions: &[String],
    frame: &Frame,
) -> StressTestResult {
    let start = Instant::now();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = versions
            .iter()
            .map(|version| {
                let dataset = store.json_dataset(filepath, versioned(None, Some(version)));
                scope.spawn(move || dataset.save(frame))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("writer thread panicked"))
            .collect()
    });

    let mut saved = Vec::new();
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(outcome) => saved.push(outcome),
            Err(e) => failed.push(e.kind()),
        }
    }

    StressTestResult {
        saved,
        failed,
        duration: start.elapsed(),
    }
}
