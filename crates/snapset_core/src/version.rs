//! Version pairs and timestamp-shaped version strings.
//!
//! A version string looks like `2019-01-02T00.00.00.000Z`: an ISO-8601 UTC
//! timestamp at millisecond precision with dots in place of colons, so it
//! is safe as a path segment on every backend. Because every field is
//! zero-padded to a fixed width, byte-wise ordering of version strings is
//! chronological ordering. The resolver relies on that.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// `strftime` pattern for version strings.
pub const VERSION_FORMAT: &str = "%Y-%m-%dT%H.%M.%S%.3fZ";

/// Length in bytes of every well-formed version string.
pub const VERSION_LEN: usize = 24;

/// A version string that does not match [`VERSION_FORMAT`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a version string of the form YYYY-MM-DDTHH.MM.SS.sssZ")]
pub struct InvalidVersion(pub String);

/// Formats `now` as a version string.
#[must_use]
pub fn generate_version(now: DateTime<Utc>) -> String {
    now.format(VERSION_FORMAT).to_string()
}

/// Checks that `candidate` is a well-formed version string.
///
/// # Errors
///
/// Returns [`InvalidVersion`] for anything that is not exactly
/// `YYYY-MM-DDTHH.MM.SS.sssZ` with a valid calendar date and time.
pub fn validate_version(candidate: &str) -> Result<(), InvalidVersion> {
    let invalid = || InvalidVersion(candidate.to_string());
    if candidate.len() != VERSION_LEN || !has_version_shape(candidate.as_bytes()) {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(candidate, VERSION_FORMAT)
        .map(|_| ())
        .map_err(|_| invalid())
}

/// Returns true if `candidate` is a well-formed version string.
#[must_use]
pub fn is_version(candidate: &str) -> bool {
    validate_version(candidate).is_ok()
}

/// Fixed-width layout check: digits everywhere except the separators.
fn has_version_shape(bytes: &[u8]) -> bool {
    const LAYOUT: &[u8; VERSION_LEN] = b"dddd-dd-ddTdd.dd.dd.dddZ";
    bytes.iter().zip(LAYOUT.iter()).all(|(&b, &expected)| {
        if expected == b'd' {
            b.is_ascii_digit()
        } else {
            b == expected
        }
    })
}

/// The load and save version intents of a dataset.
///
/// Each side is either fixed to a version string or left to be resolved:
/// the latest existing snapshot for loads, a fresh timestamp for saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Version {
    /// Version to load, or `None` for the latest.
    pub load: Option<String>,
    /// Version to save as, or `None` to generate one.
    pub save: Option<String>,
}

impl Version {
    /// Creates a version pair.
    #[must_use]
    pub fn new(load: Option<String>, save: Option<String>) -> Self {
        Self { load, save }
    }

    /// Both sides resolved automatically.
    #[must_use]
    pub fn auto() -> Self {
        Self::default()
    }

    /// Fixes the load version.
    #[must_use]
    pub fn with_load(mut self, version: impl Into<String>) -> Self {
        self.load = Some(version.into());
        self
    }

    /// Fixes the save version.
    #[must_use]
    pub fn with_save(mut self, version: impl Into<String>) -> Self {
        self.save = Some(version.into());
        self
    }

    /// Validates both fixed sides.
    ///
    /// # Errors
    ///
    /// Returns the first malformed version string.
    pub fn validate(&self) -> Result<(), InvalidVersion> {
        for version in self.load.iter().chain(self.save.iter()) {
            validate_version(version)?;
        }
        Ok(())
    }
}

impl fmt::Display for Version {
    /// `Version(load=<load>, save='<save>')`, with `None` for unset sides.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version(load={}, save='{}')",
            self.load.as_deref().unwrap_or("None"),
            self.save.as_deref().unwrap_or("None")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn generate_uses_millisecond_precision() {
        let now = Utc.with_ymd_and_hms(2019, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::microseconds(6_789);
        assert_eq!(generate_version(now), "2019-01-02T03.04.05.006Z");
    }

    #[test]
    fn generated_versions_are_valid() {
        assert!(is_version(&generate_version(Utc::now())));
    }

    #[test]
    fn validate_accepts_examples() {
        assert!(validate_version("2019-01-02T00.00.00.000Z").is_ok());
        assert!(validate_version("2019-01-01T23.59.59.999Z").is_ok());
    }

    #[test]
    fn validate_rejects_malformed() {
        for bad in [
            "",
            "latest",
            "2019-01-02T00:00:00.000Z",
            "2019-01-02T00.00.00.000",
            "2019-13-02T00.00.00.000Z",
            "2019-02-30T00.00.00.000Z",
            "2019-01-02T25.00.00.000Z",
            "2019-01-02T00.00.00.00Z0",
            "12019-01-02T00.00.00.000Z",
            "2019-01-02/00.00.00.000Z",
        ] {
            assert!(validate_version(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn display_matches_diagnostic_form() {
        let version = Version::auto()
            .with_load("2019-01-01T23.59.59.999Z")
            .with_save("2019-01-02T00.00.00.000Z");
        assert_eq!(
            version.to_string(),
            "Version(load=2019-01-01T23.59.59.999Z, save='2019-01-02T00.00.00.000Z')"
        );
        assert_eq!(Version::auto().to_string(), "Version(load=None, save='None')");
    }

    #[test]
    fn version_validate_checks_both_sides() {
        assert!(Version::auto().validate().is_ok());
        let bad = Version::auto().with_save("tomorrow");
        assert_eq!(bad.validate(), Err(InvalidVersion("tomorrow".to_string())));
    }

    #[test]
    fn version_deserializes_with_missing_fields() {
        let version: Version =
            serde_json::from_str(r#"{"save": "2019-01-02T00.00.00.000Z"}"#).unwrap();
        assert_eq!(version.load, None);
        assert_eq!(version.save.as_deref(), Some("2019-01-02T00.00.00.000Z"));
    }

    proptest! {
        #[test]
        fn lexicographic_order_is_chronological(a in 0i64..4_102_444_800_000, b in 0i64..4_102_444_800_000) {
            let ta = Utc.timestamp_millis_opt(a).unwrap();
            let tb = Utc.timestamp_millis_opt(b).unwrap();
            let (va, vb) = (generate_version(ta), generate_version(tb));
            prop_assert_eq!(va.cmp(&vb), ta.cmp(&tb));
            prop_assert!(is_version(&va));
        }
    }
}
