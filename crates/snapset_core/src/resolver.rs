//! Version resolution for loads and saves.

use crate::version::generate_version;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a load version could not be resolved.
///
/// Carries no dataset context; [`crate::VersionedDataset`] lifts it into a
/// [`crate::DatasetError`] naming the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No snapshot exists at all.
    #[error("no versions found")]
    NoVersionsFound,

    /// The requested snapshot is not among the existing ones.
    #[error("version `{version}` not found")]
    VersionNotFound {
        /// The requested version.
        version: String,
    },
}

/// Decides which version a load reads and which version a save writes.
///
/// Stateless: caching of resolved versions is the dataset's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionResolver;

impl VersionResolver {
    /// Picks the version to load.
    ///
    /// Returns `requested` if it exists, otherwise the greatest existing
    /// version. Version strings order chronologically, so the greatest is
    /// the most recent.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoVersionsFound`] if `existing` is empty
    /// - [`ResolveError::VersionNotFound`] if `requested` is not in `existing`
    pub fn resolve_for_load(
        existing: &BTreeSet<String>,
        requested: Option<&str>,
    ) -> Result<String, ResolveError> {
        let Some(latest) = existing.last() else {
            return Err(ResolveError::NoVersionsFound);
        };
        match requested {
            Some(version) if existing.contains(version) => Ok(version.to_string()),
            Some(version) => Err(ResolveError::VersionNotFound {
                version: version.to_string(),
            }),
            None => Ok(latest.clone()),
        }
    }

    /// Picks the version to save as: `requested`, or a timestamp generated
    /// from `now`.
    #[must_use]
    pub fn resolve_for_save(requested: Option<&str>, now: DateTime<Utc>) -> String {
        requested.map_or_else(|| generate_version(now), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::is_version;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn set(versions: &[&str]) -> BTreeSet<String> {
        versions.iter().map(|v| (*v).to_string()).collect()
    }

    const V1: &str = "2019-01-01T23.59.59.999Z";
    const V2: &str = "2019-01-02T00.00.00.000Z";

    #[test]
    fn empty_set_has_no_versions() {
        assert_eq!(
            VersionResolver::resolve_for_load(&BTreeSet::new(), None),
            Err(ResolveError::NoVersionsFound)
        );
        assert_eq!(
            VersionResolver::resolve_for_load(&BTreeSet::new(), Some(V1)),
            Err(ResolveError::NoVersionsFound)
        );
    }

    #[test]
    fn latest_wins_without_request() {
        assert_eq!(
            VersionResolver::resolve_for_load(&set(&[V2, V1]), None).unwrap(),
            V2
        );
    }

    #[test]
    fn requested_version_is_honoured() {
        assert_eq!(
            VersionResolver::resolve_for_load(&set(&[V1, V2]), Some(V1)).unwrap(),
            V1
        );
    }

    #[test]
    fn missing_request_is_version_not_found() {
        assert_eq!(
            VersionResolver::resolve_for_load(&set(&[V2]), Some(V1)),
            Err(ResolveError::VersionNotFound {
                version: V1.to_string()
            })
        );
    }

    #[test]
    fn save_prefers_requested() {
        assert_eq!(VersionResolver::resolve_for_save(Some(V2), Utc::now()), V2);
    }

    #[test]
    fn save_generates_from_now() {
        let now = Utc.with_ymd_and_hms(2020, 5, 6, 7, 8, 9).unwrap();
        let version = VersionResolver::resolve_for_save(None, now);
        assert_eq!(version, "2020-05-06T07.08.09.000Z");
        assert!(is_version(&version));
    }

    fn version_strategy() -> impl Strategy<Value = String> {
        (0i64..4_102_444_800_000)
            .prop_map(|ms| generate_version(Utc.timestamp_millis_opt(ms).unwrap()))
    }

    proptest! {
        #[test]
        fn newer_of_two_is_loaded(a in version_strategy(), b in version_strategy()) {
            prop_assume!(a != b);
            let expected = if a < b { b.clone() } else { a.clone() };
            let existing = set(&[a.as_str(), b.as_str()]);
            prop_assert_eq!(VersionResolver::resolve_for_load(&existing, None).unwrap(), expected);
        }

        #[test]
        fn absent_request_fails(a in version_strategy(), b in version_strategy()) {
            prop_assume!(a != b);
            let existing = set(&[a.as_str()]);
            prop_assert_eq!(
                VersionResolver::resolve_for_load(&existing, Some(b.as_str())),
                Err(ResolveError::VersionNotFound { version: b.clone() })
            );
        }
    }
}
