//! Mapping logical dataset paths to physical snapshot paths.
//!
//! ```text
//! unversioned:  <parent>/<name>
//! versioned:    <parent>/<name>/<version>/<name>
//! ```
//!
//! Every versioned path still ends in the original file name, so tools
//! that look at extensions keep working. `<parent>/<name>` doubles as the
//! directory whose children are the existing versions.

use snapset_storage::path::{join, split};
use thiserror::Error;

/// A logical path that cannot name a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is empty or only separators.
    #[error("logical path is empty")]
    Empty,

    /// The path ends in a separator, so it has no file name.
    #[error("logical path `{0}` has no file name")]
    NoFileName(String),

    /// The path contains `.` or `..` segments.
    #[error("logical path `{0}` contains relative segments")]
    RelativeSegment(String),
}

/// Builds physical paths for one logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    logical: String,
}

impl PathBuilder {
    /// Creates a builder for `logical`.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `logical` has no usable file name.
    pub fn new(logical: impl Into<String>) -> Result<Self, PathError> {
        let logical = logical.into();
        if logical.trim_matches('/').is_empty() {
            return Err(PathError::Empty);
        }
        if logical.ends_with('/') {
            return Err(PathError::NoFileName(logical));
        }
        if logical.split('/').any(|s| s == "." || s == "..") {
            return Err(PathError::RelativeSegment(logical));
        }
        Ok(Self { logical })
    }

    /// The logical path as given.
    #[must_use]
    pub fn logical(&self) -> &str {
        &self.logical
    }

    /// Returns the physical path for `version`, or the logical path
    /// unchanged when unversioned.
    #[must_use]
    pub fn build(&self, version: Option<&str>) -> String {
        match version {
            None => self.logical.clone(),
            Some(version) => {
                let (_, basename) = split(&self.logical);
                join(&join(&self.logical, version), basename)
            }
        }
    }

    /// Returns the directory whose child names are the existing versions.
    #[must_use]
    pub fn version_root(&self) -> &str {
        &self.logical
    }
}
