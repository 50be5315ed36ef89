//! Helpers for `/`-separated storage paths.
//!
//! Every backend receives paths in the same form: segments joined by `/`,
//! with an optional leading `/`. These helpers normalise and validate that
//! form so adapters agree on what a path means.

use crate::error::{StorageError, StorageResult};

/// Path separator used by every backend.
pub const SEPARATOR: char = '/';

/// Splits `path` into its non-empty segments.
///
/// Leading, trailing and doubled separators are ignored. `.` and `..`
/// segments are rejected so no backend can be walked outside its root.
///
/// # Errors
///
/// Returns `InvalidPath` for `.`/`..` segments.
pub fn segments(path: &str) -> StorageResult<Vec<&str>> {
    let mut out = Vec::new();
    for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(StorageError::invalid_path(
                path,
                "relative segments are not allowed",
            ));
        }
        out.push(segment);
    }
    Ok(out)
}

/// Returns the canonical key for `path`: its segments joined by `/`.
///
/// # Errors
///
/// Same as [`segments`].
pub fn normalize(path: &str) -> StorageResult<String> {
    Ok(segments(path)?.join("/"))
}

/// Joins two path fragments with a single separator.
#[must_use]
pub fn join(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches(SEPARATOR);
    let child = child.trim_start_matches(SEPARATOR);
    if parent.is_empty() {
        child.to_string()
    } else if child.is_empty() {
        parent.to_string()
    } else {
        format!("{parent}{SEPARATOR}{child}")
    }
}

/// Splits `path` into `(parent, basename)` at the last separator.
///
/// The parent is empty for a single-segment path. A leading separator is
/// kept on the parent so absolute paths stay absolute.
#[must_use]
pub fn split(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn segments_skip_empty_parts() {
        assert_eq!(segments("/a//b/c/").unwrap(), vec!["a", "b", "c"]);
        assert!(segments("").unwrap().is_empty());
    }

    #[test]
    fn segments_reject_parent_refs() {
        assert!(matches!(
            segments("a/../b"),
            Err(StorageError::InvalidPath { .. })
        ));
        assert!(segments("./a").is_err());
    }

    #[test]
    fn normalize_strips_separators() {
        assert_eq!(normalize("/data/01_raw/").unwrap(), "data/01_raw");
    }

    #[test]
    fn join_handles_edges() {
        assert_eq!(join("", "a.json"), "a.json");
        assert_eq!(join("data/", "/a.json"), "data/a.json");
        assert_eq!(join("data", ""), "data");
    }

    #[test]
    fn split_at_last_separator() {
        assert_eq!(split("data/raw/a.json"), ("data/raw", "a.json"));
        assert_eq!(split("a.json"), ("", "a.json"));
        assert_eq!(split("/a.json"), ("", "a.json"));
        assert_eq!(split("/tmp/a.json"), ("/tmp", "a.json"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(path in "[a-z/]{0,24}") {
            let once = normalize(&path).unwrap();
            prop_assert_eq!(normalize(&once).unwrap(), once);
        }

        #[test]
        fn split_undoes_join(parent in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", name in "[a-z]{1,8}") {
            let joined = join(&parent, &name);
            prop_assert_eq!(split(&joined), (parent.as_str(), name.as_str()));
        }
    }
}
