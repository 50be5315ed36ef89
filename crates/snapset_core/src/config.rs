//! Dataset configuration.

use crate::version::{InvalidVersion, Version};
use serde::{Deserialize, Serialize};
use snapset_codec::CodecArgs;
use snapset_storage::WriteMode;

/// Configuration for a [`crate::VersionedDataset`].
///
/// Derives serde so callers can keep dataset entries in a catalog file;
/// reading that file is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Version intents. `None` disables versioning.
    pub version: Option<Version>,

    /// Arguments passed to every decode.
    pub load_args: CodecArgs,

    /// Arguments passed to every encode.
    pub save_args: CodecArgs,

    /// Whether a write may replace existing data at the backend.
    pub overwrite: bool,

    /// Name used in diagnostics instead of `<format><backend>DataSet`.
    pub type_name: Option<String>,
}

impl DatasetConfig {
    /// Creates a configuration with default values: unversioned, no
    /// arguments, no overwrite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables versioning with the given intents.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Adds one load argument.
    #[must_use]
    pub fn load_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.load_args.insert(key.into(), value.into());
        self
    }

    /// Adds one save argument.
    #[must_use]
    pub fn save_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.save_args.insert(key.into(), value.into());
        self
    }

    /// Sets whether writes may replace existing data.
    #[must_use]
    pub fn overwrite(mut self, value: bool) -> Self {
        self.overwrite = value;
        self
    }

    /// Overrides the type name shown in diagnostics.
    #[must_use]
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    /// Returns true if versioning is enabled.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// Checks that fixed versions are well-formed version strings.
    ///
    /// # Errors
    ///
    /// Returns the first malformed version string.
    pub fn validate(&self) -> Result<(), InvalidVersion> {
        self.version.as_ref().map_or(Ok(()), Version::validate)
    }

    /// Backend write mode selected by [`Self::overwrite`].
    #[must_use]
    pub fn write_mode(&self) -> WriteMode {
        if self.overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::CreateNew
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DatasetConfig::default();
        assert!(!config.is_versioned());
        assert!(!config.overwrite);
        assert!(config.load_args.is_empty());
        assert_eq!(config.write_mode(), WriteMode::CreateNew);
    }

    #[test]
    fn builder_pattern() {
        let config = DatasetConfig::new()
            .version(Version::auto().with_save("2019-01-02T00.00.00.000Z"))
            .save_arg("indent", "2")
            .load_arg("k1", "v1")
            .overwrite(true)
            .type_name("CarsDataSet");

        assert!(config.is_versioned());
        assert_eq!(config.save_args.get("indent").map(String::as_str), Some("2"));
        assert_eq!(config.load_args.get("k1").map(String::as_str), Some("v1"));
        assert_eq!(config.write_mode(), WriteMode::Overwrite);
        assert_eq!(config.type_name.as_deref(), Some("CarsDataSet"));
    }

    #[test]
    fn deserializes_catalog_entry() {
        let config: DatasetConfig = serde_json::from_str(
            r#"{
                "version": {"load": "2019-01-01T23.59.59.999Z"},
                "save_args": {"indent": "4"}
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.version,
            Some(Version::auto().with_load("2019-01-01T23.59.59.999Z"))
        );
        assert_eq!(config.save_args.len(), 1);
        assert!(!config.overwrite);
    }

    #[test]
    fn validate_checks_fixed_versions() {
        assert!(DatasetConfig::new().validate().is_ok());
        assert!(DatasetConfig::new().version(Version::auto()).validate().is_ok());

        let config = DatasetConfig::new().version(Version::auto().with_load("2019-13-01T00.00.00.000Z"));
        assert_eq!(
            config.validate(),
            Err(InvalidVersion("2019-13-01T00.00.00.000Z".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = serde_json::from_str::<DatasetConfig>(r#"{"versoin": null}"#);
        assert!(result.is_err());
    }
}
