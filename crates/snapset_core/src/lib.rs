//! # Snapset Core
//!
//! Versioned datasets for Snapset.
//!
//! A dataset is a named piece of data stored at a logical path. When
//! versioning is enabled every save writes an immutable snapshot under
//! `<logical>/<version>/<basename>` and loads read the latest (or a pinned)
//! snapshot.
//!
//! This crate provides:
//! - [`VersionedDataset`] - load / save / exists over a backend and a codec
//! - [`VersionResolver`] - choosing load and save versions
//! - [`PathBuilder`] - logical to physical path mapping
//! - Version string generation and validation
//! - [`DatasetConfig`] - serde-friendly dataset configuration
//!
//! Storage lives in `snapset_storage`, encodings in `snapset_codec`.
//!
//! ## Example
//!
//! ```rust
//! use snapset_codec::TextCodec;
//! use snapset_core::{DatasetConfig, Version, VersionedDataset};
//! use snapset_storage::InMemoryBackend;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(InMemoryBackend::new());
//! let config = DatasetConfig::new().version(Version::auto());
//!
//! let writer = VersionedDataset::new("notes.txt", Arc::clone(&backend), TextCodec, config.clone())?;
//! let outcome = writer.save(&"hello".to_string())?;
//! assert!(outcome.warning.is_none());
//!
//! let reader = VersionedDataset::new("notes.txt", backend, TextCodec, config)?;
//! assert_eq!(reader.load()?, "hello");
//! # Ok::<(), snapset_core::DatasetError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod dataset;
mod error;
mod path;
mod resolver;
mod version;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::DatasetConfig;
pub use dataset::{SaveOutcome, VersionedDataset};
pub use error::{DatasetError, DatasetErrorKind, DatasetResult, DatasetWarning, Operation};
pub use path::{PathBuilder, PathError};
pub use resolver::{ResolveError, VersionResolver};
pub use version::{
    generate_version, is_version, validate_version, InvalidVersion, Version, VERSION_FORMAT,
    VERSION_LEN,
};
