//! Local-disk storage backend.

use crate::backend::{StorageBackend, WriteMode};
use crate::error::{StorageError, StorageResult};
use crate::path;
use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A storage backend over a local directory tree.
///
/// Storage paths are resolved below `root`; a leading `/` does not escape
/// it. Intermediate directories are created on write.
///
/// # Durability
///
/// Every write goes to a hidden temporary sibling that is synced before it
/// becomes visible, so readers never see a torn file and a failed write
/// leaves nothing at the target:
///
/// - `CreateNew` publishes with `hard_link`, which fails if the target
///   exists (the filesystem must support hard links)
/// - `Overwrite` publishes with `rename` over the target
///
/// Directories created for a failed write are removed again if empty.
///
/// # Example
///
/// ```no_run
/// use snapset_storage::{FileBackend, StorageBackend, WriteMode};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("data")).unwrap();
/// backend.write_bytes("01_raw/cars.csv", b"a,b\n", WriteMode::CreateNew).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens a backend rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or `root`
    /// exists but is not a directory.
    pub fn open(root: &Path) -> StorageResult<Self> {
        let display = root.display().to_string();
        fs::create_dir_all(root).map_err(|e| StorageError::from_io(display.clone(), e))?;
        if !root.is_dir() {
            return Err(StorageError::invalid_path(display, "root is not a directory"));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a storage path to a location on disk.
    fn resolve(&self, storage_path: &str) -> StorageResult<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in path::segments(storage_path)? {
            resolved.push(segment);
        }
        Ok(resolved)
    }

    /// Stages `data` in a temporary sibling of `target` and publishes it.
    ///
    /// `fill` writes the payload into the staged file.
    fn write_staged<F>(
        target: &Path,
        storage_path: &str,
        data: &[u8],
        mode: WriteMode,
        fill: F,
    ) -> StorageResult<()>
    where
        F: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let temp = temp_sibling(target);
        let result = Self::fill_temp(&temp, data, fill)
            .and_then(|()| match mode {
                WriteMode::CreateNew => fs::hard_link(&temp, target),
                WriteMode::Overwrite => fs::rename(&temp, target),
            })
            .map_err(|e| StorageError::from_io(storage_path, e));
        // Gone after a successful rename, present in every other case.
        let _ = fs::remove_file(&temp);
        result
    }

    fn fill_temp<F>(temp: &Path, data: &[u8], fill: F) -> io::Result<()>
    where
        F: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp)?;
        fill(&mut file, data)?;
        file.sync_all()
    }

    /// Directories between `root` and `dir` that do not exist yet,
    /// deepest first.
    fn missing_dirs(&self, dir: &Path) -> Vec<PathBuf> {
        dir.ancestors()
            .take_while(|d| *d != self.root.as_path() && !d.exists())
            .map(Path::to_path_buf)
            .collect()
    }

    fn write_with<F>(
        &self,
        storage_path: &str,
        data: &[u8],
        mode: WriteMode,
        fill: F,
    ) -> StorageResult<()>
    where
        F: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let target = self.resolve(storage_path)?;
        if target == self.root {
            return Err(StorageError::invalid_path(storage_path, "cannot write to root"));
        }
        let created = match target.parent() {
            Some(parent) => {
                let created = self.missing_dirs(parent);
                fs::create_dir_all(parent).map_err(|e| StorageError::from_io(storage_path, e))?;
                created
            }
            None => Vec::new(),
        };

        tracing::trace!(path = %target.display(), ?mode, len = data.len(), "writing file");
        let result = Self::write_staged(&target, storage_path, data, mode, fill);
        if result.is_err() {
            // remove_dir only succeeds on empty directories, so concurrent
            // writers keep theirs.
            for dir in &created {
                if fs::remove_dir(dir).is_err() {
                    break;
                }
            }
        }
        result
    }
}

/// `<dir>/.<name>.<uuid>.tmp`
fn temp_sibling(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
}

impl StorageBackend for FileBackend {
    fn kind(&self) -> Cow<'static, str> {
        Cow::Borrowed("Local")
    }

    fn describe(&self) -> Vec<(String, String)> {
        vec![("root".to_string(), self.root.display().to_string())]
    }

    fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let target = self.resolve(storage_path)?;
        target
            .try_exists()
            .map_err(|e| StorageError::from_io(storage_path, e))
    }

    fn list_children(&self, storage_path: &str) -> StorageResult<Vec<String>> {
        let target = self.resolve(storage_path)?;
        let entries =
            fs::read_dir(&target).map_err(|e| StorageError::from_io(storage_path, e))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::from_io(storage_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // In-flight write temporaries are not children.
            if name.starts_with('.') && name.ends_with(".tmp") {
                continue;
            }
            children.push(name);
        }
        children.sort();
        Ok(children)
    }

    fn read_bytes(&self, storage_path: &str) -> StorageResult<Vec<u8>> {
        let target = self.resolve(storage_path)?;
        fs::read(&target).map_err(|e| StorageError::from_io(storage_path, e))
    }

    fn write_bytes(&self, storage_path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()> {
        self.write_with(storage_path, data, mode, |file, data| file.write_all(data))
    }
}
