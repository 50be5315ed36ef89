//! Versioned datasets: load, save and existence checks over a storage
//! backend and a codec.
//!
//! ## Protocol
//!
//! - **load**: list the versions under the logical path, pick the fixed or
//!   latest one, read the snapshot, decode it
//! - **save**: pick the fixed or a fresh version, refuse if the snapshot
//!   path exists, encode and write, then check that a load would read what
//!   was just written (warning only)
//! - **exists**: a missing parent or an empty listing is `false`; other
//!   backend failures are errors
//!
//! Resolved versions are cached per instance, separately for load and save,
//! and never re-resolved. A second save on the same instance therefore
//! targets the same snapshot and is refused.
//!
//! ## Concurrency
//!
//! Loads may run concurrently. Saves on one logical path must be
//! serialised by the caller: the exists-then-write sequence is not atomic
//! and no locking is done here.

use crate::clock::{Clock, SystemClock};
use crate::config::DatasetConfig;
use crate::error::{DatasetError, DatasetResult, DatasetWarning, Operation};
use crate::path::PathBuilder;
use crate::resolver::{ResolveError, VersionResolver};
use crate::version::{is_version, Version};
use parking_lot::Mutex;
use snapset_codec::{Codec, CodecArgs, CodecError};
use snapset_storage::{StorageBackend, StorageError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Physical path written.
    pub path: String,
    /// Version written, `None` for unversioned datasets.
    pub version: Option<String>,
    /// Read-after-write inconsistency, if one was detected.
    pub warning: Option<DatasetWarning>,
}

/// A named dataset stored through backend `B` and encoded by codec `C`.
///
/// # Example
///
/// ```rust
/// use snapset_codec::JsonCodec;
/// use snapset_core::{DatasetConfig, Version, VersionedDataset};
/// use snapset_storage::InMemoryBackend;
///
/// let dataset = VersionedDataset::new(
///     "test.json",
///     InMemoryBackend::new(),
///     JsonCodec::<Vec<i64>>::new(),
///     DatasetConfig::new().version(Version::auto()),
/// )
/// .unwrap();
///
/// assert!(!dataset.exists().unwrap());
/// dataset.save(&vec![1, 2, 3]).unwrap();
/// assert_eq!(dataset.load().unwrap(), vec![1, 2, 3]);
/// ```
pub struct VersionedDataset<B, C> {
    paths: PathBuilder,
    backend: B,
    codec: C,
    config: DatasetConfig,
    clock: Arc<dyn Clock>,
    subject: String,
    load_version: Mutex<Option<String>>,
    save_version: Mutex<Option<String>>,
}

impl<B, C> VersionedDataset<B, C>
where
    B: StorageBackend,
    C: Codec,
{
    /// Creates a dataset over `filepath`.
    ///
    /// Nothing is read or written; versions are resolved on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Configuration`] if `filepath` has no file
    /// name or a fixed version is not a well-formed version string.
    pub fn new(
        filepath: impl Into<String>,
        backend: B,
        codec: C,
        config: DatasetConfig,
    ) -> DatasetResult<Self> {
        let filepath = filepath.into();
        let subject = describe(&filepath, &backend, &codec, &config);
        let configuration = |message: String| DatasetError::Configuration {
            subject: subject.clone(),
            message,
        };

        let paths = PathBuilder::new(filepath).map_err(|e| configuration(e.to_string()))?;
        config.validate().map_err(|e| configuration(e.to_string()))?;

        Ok(Self {
            paths,
            backend,
            codec,
            config,
            clock: Arc::new(SystemClock),
            subject,
            load_version: Mutex::new(None),
            save_version: Mutex::new(None),
        })
    }

    /// Replaces the clock used to generate save versions.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The logical path.
    #[must_use]
    pub fn logical_path(&self) -> &str {
        self.paths.logical()
    }

    /// The version intents, `None` when unversioned.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.config.version.as_ref()
    }

    /// The configuration this dataset was built with.
    #[must_use]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// The storage backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns true if versioning is enabled.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.config.is_versioned()
    }

    /// The load version resolved so far, if any.
    #[must_use]
    pub fn resolved_load_version(&self) -> Option<String> {
        self.load_version.lock().clone()
    }

    /// The save version resolved so far, if any.
    #[must_use]
    pub fn resolved_save_version(&self) -> Option<String> {
        self.save_version.lock().clone()
    }

    /// Loads and decodes the current snapshot.
    ///
    /// # Errors
    ///
    /// - `NoVersionsFound` / `VersionNotFound` when versioned and nothing
    ///   matching exists
    /// - `Backend` / `Codec` when reading or decoding fails
    pub fn load(&self) -> DatasetResult<C::Value> {
        let path = self.load_path()?;
        debug!(dataset = %self.subject, path = %path, "loading");

        let bytes = self
            .backend
            .read_bytes(&path)
            .map_err(|e| self.backend_error(Operation::Load, e))?;
        self.codec
            .decode(&bytes, &self.config.load_args)
            .map_err(|e| self.codec_error(Operation::Load, e))
    }

    /// Encodes and writes `value` as a new snapshot.
    ///
    /// A versioned save refuses to touch an existing snapshot path. After
    /// writing, the load path is recomputed; if it differs from the path
    /// just written the outcome carries a warning, but the save still
    /// succeeds.
    ///
    /// # Errors
    ///
    /// - `OverwriteRefused` when versioned and the save path exists
    /// - `Backend` / `Codec` when encoding or writing fails
    pub fn save(&self, value: &C::Value) -> DatasetResult<SaveOutcome> {
        let version = self.is_versioned().then(|| self.resolve_save_version());
        let path = self.paths.build(version.as_deref());

        if version.is_some() {
            let taken = self
                .backend
                .exists(&path)
                .map_err(|e| self.backend_error(Operation::Save, e))?;
            if taken {
                return Err(self.overwrite_refused(&path));
            }
        }

        let bytes = self
            .codec
            .encode(value, &self.config.save_args)
            .map_err(|e| self.codec_error(Operation::Save, e))?;

        debug!(dataset = %self.subject, path = %path, len = bytes.len(), "saving");
        self.backend
            .write_bytes(&path, &bytes, self.config.write_mode())
            .map_err(|e| match e {
                StorageError::AlreadyExists { .. } if version.is_some() => {
                    self.overwrite_refused(&path)
                }
                other => self.backend_error(Operation::Save, other),
            })?;

        let warning = match version {
            Some(_) => self.check_consistency(&path),
            None => None,
        };
        Ok(SaveOutcome {
            path,
            version,
            warning,
        })
    }

    /// Returns whether the snapshot a load would read exists.
    ///
    /// # Errors
    ///
    /// Returns `Backend` for backend failures other than "not found".
    pub fn exists(&self) -> DatasetResult<bool> {
        let path = if self.is_versioned() {
            match self.resolve_load_version(Operation::Exists) {
                Ok(version) => self.paths.build(Some(&version)),
                Err(DatasetError::NoVersionsFound { .. } | DatasetError::VersionNotFound { .. }) => {
                    return Ok(false)
                }
                Err(other) => return Err(other),
            }
        } else {
            self.paths.build(None)
        };

        match self.backend.exists(&path) {
            Ok(found) => Ok(found),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(self.backend_error(Operation::Exists, e)),
        }
    }

    /// The physical path a load reads, resolving the load version if needed.
    ///
    /// # Errors
    ///
    /// Same resolution errors as [`Self::load`].
    pub fn load_path(&self) -> DatasetResult<String> {
        if !self.is_versioned() {
            return Ok(self.paths.build(None));
        }
        let version = self.resolve_load_version(Operation::Load)?;
        Ok(self.paths.build(Some(&version)))
    }

    /// The physical path a save writes, resolving the save version if needed.
    #[must_use]
    pub fn save_path(&self) -> String {
        let version = self.is_versioned().then(|| self.resolve_save_version());
        self.paths.build(version.as_deref())
    }

    fn fixed_load_version(&self) -> Option<&str> {
        self.config.version.as_ref().and_then(|v| v.load.as_deref())
    }

    fn fixed_save_version(&self) -> Option<&str> {
        self.config.version.as_ref().and_then(|v| v.save.as_deref())
    }

    /// Resolves the load version once; failures are not cached.
    fn resolve_load_version(&self, operation: Operation) -> DatasetResult<String> {
        let mut cached = self.load_version.lock();
        if let Some(version) = cached.as_ref() {
            return Ok(version.clone());
        }

        let existing = self.list_versions(operation)?;
        let resolved = VersionResolver::resolve_for_load(&existing, self.fixed_load_version())
            .map_err(|e| self.resolve_error(e))?;

        debug!(dataset = %self.subject, version = %resolved, "resolved load version");
        *cached = Some(resolved.clone());
        Ok(resolved)
    }

    fn resolve_save_version(&self) -> String {
        let mut cached = self.save_version.lock();
        cached
            .get_or_insert_with(|| {
                let resolved =
                    VersionResolver::resolve_for_save(self.fixed_save_version(), self.clock.now());
                debug!(dataset = %self.subject, version = %resolved, "resolved save version");
                resolved
            })
            .clone()
    }

    /// Lists existing versions; a missing version root is an empty set.
    fn list_versions(&self, operation: Operation) -> DatasetResult<BTreeSet<String>> {
        let root = self.paths.version_root();
        let names = match self.backend.list_children(root) {
            Ok(names) => names,
            Err(e) if e.is_not_found() => return Ok(BTreeSet::new()),
            Err(e) => return Err(self.backend_error(operation, e)),
        };

        let mut versions = BTreeSet::new();
        for name in names {
            if is_version(&name) {
                versions.insert(name);
            } else {
                debug!(dataset = %self.subject, entry = %name, "skipping non-version entry");
            }
        }
        Ok(versions)
    }

    /// Compares the path just written with the path a load would read.
    fn check_consistency(&self, save_path: &str) -> Option<DatasetWarning> {
        let load_path = match self.fixed_load_version() {
            Some(version) => Ok(self.paths.build(Some(version))),
            None => self
                .resolve_load_version(Operation::Save)
                .map(|version| self.paths.build(Some(&version))),
        };

        let warning = match load_path {
            Ok(load_path) if load_path == save_path => return None,
            Ok(load_path) => DatasetWarning::PathMismatch {
                save_path: save_path.to_string(),
                load_path,
                subject: self.subject.clone(),
            },
            Err(e) => DatasetWarning::NotVisible {
                save_path: save_path.to_string(),
                reason: e.to_string(),
                subject: self.subject.clone(),
            },
        };
        warn!(dataset = %self.subject, "{warning}");
        Some(warning)
    }

    fn resolve_error(&self, error: ResolveError) -> DatasetError {
        match error {
            ResolveError::NoVersionsFound => DatasetError::NoVersionsFound {
                subject: self.subject.clone(),
            },
            ResolveError::VersionNotFound { version } => DatasetError::VersionNotFound {
                subject: self.subject.clone(),
                version,
            },
        }
    }

    fn overwrite_refused(&self, path: &str) -> DatasetError {
        DatasetError::OverwriteRefused {
            subject: self.subject.clone(),
            path: path.to_string(),
        }
    }

    fn backend_error(&self, operation: Operation, source: StorageError) -> DatasetError {
        DatasetError::Backend {
            operation,
            subject: self.subject.clone(),
            source,
        }
    }

    fn codec_error(&self, operation: Operation, source: CodecError) -> DatasetError {
        DatasetError::Codec {
            operation,
            subject: self.subject.clone(),
            source,
        }
    }
}

impl<B, C> fmt::Display for VersionedDataset<B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subject)
    }
}

impl<B, C> fmt::Debug for VersionedDataset<B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedDataset")
            .field("subject", &self.subject)
            .field("load_version", &*self.load_version.lock())
            .field("save_version", &*self.save_version.lock())
            .finish_non_exhaustive()
    }
}

/// Builds the diagnostic string:
/// `TypeName(filepath=<path>, <key>=<value>..., version=Version(...))`.
///
/// Keys after `filepath` come from the backend description and the
/// non-empty argument maps, sorted by key.
fn describe<B, C>(filepath: &str, backend: &B, codec: &C, config: &DatasetConfig) -> String
where
    B: StorageBackend,
    C: Codec,
{
    let type_name = config
        .type_name
        .clone()
        .unwrap_or_else(|| format!("{}{}DataSet", codec.format(), backend.kind()));

    let mut keys: BTreeMap<String, String> = backend
        .describe()
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    if !config.load_args.is_empty() {
        keys.insert("load_args".to_string(), render_args(&config.load_args));
    }
    if !config.save_args.is_empty() {
        keys.insert("save_args".to_string(), render_args(&config.save_args));
    }

    let mut parts = vec![format!("filepath={filepath}")];
    parts.extend(keys.into_iter().map(|(key, value)| format!("{key}={value}")));
    if let Some(version) = &config.version {
        parts.push(format!("version={version}"));
    }
    format!("{type_name}({})", parts.join(", "))
}

/// `{'k1': 'v1', 'k2': 'v2'}`
fn render_args(args: &CodecArgs) -> String {
    let body = args
        .iter()
        .map(|(key, value)| format!("'{key}': '{value}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}
