//! # Snapset Testkit
//!
//! Test utilities for Snapset.
//!
//! This crate provides:
//! - Fixtures for in-memory and temp-dir backed datasets
//! - [`FaultyBackend`] for injecting backend failures
//! - Property-based test generators using proptest
//! - Concurrent save helpers
//!
//! The cross-crate scenario tests live in this crate's `tests/` directory.
//!
//! ## Usage
//!
//! ```rust
//! use snapset_testkit::prelude::*;
//!
//! for_each_store(|store| {
//!     let dataset = store.json_dataset("frame.json", versioned(None, None));
//!     dataset.save(&sample_frame()).unwrap();
//!     assert_eq!(dataset.load().unwrap(), sample_frame());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
pub use stress::*;
