//! # Snapset Storage
//!
//! Storage backend trait and adapters for Snapset.
//!
//! Backends are **opaque byte stores** addressed by `/`-separated paths.
//! They know nothing about versions, snapshots or encodings; the dataset
//! layer in `snapset_core` owns all of that.
//!
//! ## Design Principles
//!
//! - Four capabilities only: exists, list children, read, write
//! - "Missing" is reported as [`StorageError::NotFound`] so callers can tell
//!   an absent resource apart from a failing one
//! - Overwrites are opt-in through [`WriteMode::Overwrite`]
//! - Must be `Send + Sync`; handles are passed explicitly, never looked up
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - Flat key space, behaves like a cloud object store
//! - [`FileBackend`] - Local disk rooted at a directory
//! - [`EncryptedBackend`] - Wrapper that adds AES-256-GCM encryption
//!
//! ## Example
//!
//! ```rust
//! use snapset_storage::{InMemoryBackend, StorageBackend, WriteMode};
//!
//! let backend = InMemoryBackend::new();
//! backend.write_bytes("raw/cars.csv", b"a,b\n1,2\n", WriteMode::CreateNew).unwrap();
//! assert!(backend.exists("raw/cars.csv").unwrap());
//! assert_eq!(backend.list_children("raw").unwrap(), vec!["cars.csv".to_string()]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod encrypted;
mod error;
mod file;
mod memory;
pub mod path;

pub use backend::{StorageBackend, WriteMode};
pub use encrypted::{EncryptedBackend, EncryptionKey, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
