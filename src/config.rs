//! Create options and their validation.
//!
//! Options are validated and migrated once when a [`Webview`](crate::Webview)
//! is constructed and never change afterwards.

use crate::error::{Error, Result};
use crate::version::{
    compare, library_version, Version, EXPLICIT_SHOW_VERSION, MIN_SUPPORTED_VERSION,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for creating a webview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptions {
    /// Minimum library version whose behavior the caller requires.
    /// `0.0.0` selects the library's minimum supported version.
    #[serde(default = "default_minimum_required_version")]
    pub minimum_required_version: Version,

    /// Enable developer tools where the engine supports them
    #[serde(default)]
    pub debug: bool,

    /// Native handle of a parent window to embed into, as an opaque value.
    /// `None` creates a standalone window.
    #[serde(default)]
    pub embed_target: Option<u64>,

    /// Make the window initially visible. Forced on when the required
    /// version predates 0.11.
    #[serde(default)]
    pub visible: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            minimum_required_version: MIN_SUPPORTED_VERSION,
            debug: false,
            embed_target: None,
            visible: false,
        }
    }
}

impl CreateOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum required version
    pub fn with_minimum_required_version(mut self, version: Version) -> Self {
        self.minimum_required_version = version;
        self
    }

    /// Enable or disable developer tools
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Embed into an existing native window
    pub fn with_embed_target(mut self, handle: u64) -> Self {
        self.embed_target = Some(handle);
        self
    }

    /// Set initial visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Load options from a JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check the requested version against what the library provides
    pub fn validate(&self) -> Result<()> {
        let requested = self.minimum_required_version;
        if compare(&requested, &MIN_SUPPORTED_VERSION) < 0 {
            return Err(Error::VersionTooOld {
                requested,
                minimum: MIN_SUPPORTED_VERSION,
            });
        }

        let library = library_version();
        if compare(&requested, &library) > 0 {
            return Err(Error::VersionTooRecent { requested, library });
        }

        Ok(())
    }

    /// Resolve the `0.0.0` sentinel, validate, and apply behavior of older
    /// requested versions.
    pub fn apply_compatibility(mut self) -> Result<Self> {
        if self.minimum_required_version.is_zero() {
            self.minimum_required_version = MIN_SUPPORTED_VERSION;
        }
        self.validate()?;
        if compare(&self.minimum_required_version, &EXPLICIT_SHOW_VERSION) < 0 {
            self.visible = true;
        }
        Ok(self)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn default_minimum_required_version() -> Version {
    MIN_SUPPORTED_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_options() {
        let options = CreateOptions::default();
        assert_eq!(options.minimum_required_version, MIN_SUPPORTED_VERSION);
        assert!(!options.debug);
        assert!(options.embed_target.is_none());
    }

    #[test]
    fn test_options_builder() {
        let options = CreateOptions::new()
            .with_debug(true)
            .with_embed_target(0xdead)
            .with_visible(true);

        assert!(options.debug);
        assert_eq!(options.embed_target, Some(0xdead));
        assert!(options.visible);
    }

    #[test]
    fn test_too_old() {
        let err = CreateOptions::new()
            .with_minimum_required_version(Version::new(0, 9, 0))
            .apply_compatibility()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::VersionTooOld);
    }

    #[test]
    fn test_too_recent() {
        let err = CreateOptions::new()
            .with_minimum_required_version(Version::new(99, 0, 0))
            .apply_compatibility()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::VersionTooRecent);
    }

    #[test]
    fn test_zero_means_minimum_supported() {
        let options = CreateOptions::new()
            .with_minimum_required_version(Version::ZERO)
            .apply_compatibility()
            .unwrap();
        assert_eq!(options.minimum_required_version, MIN_SUPPORTED_VERSION);
    }

    #[test]
    fn test_old_behavior_forces_visible() {
        let options = CreateOptions::new()
            .with_minimum_required_version(Version::new(0, 10, 0))
            .with_visible(false)
            .apply_compatibility()
            .unwrap();
        assert!(options.visible);

        let options = CreateOptions::new()
            .with_minimum_required_version(Version::new(0, 11, 0))
            .with_visible(false)
            .apply_compatibility()
            .unwrap();
        assert!(!options.visible);
    }

    #[test]
    fn test_from_json_defaults() {
        let options = CreateOptions::from_json(r#"{"debug": true}"#).unwrap();
        assert!(options.debug);
        assert_eq!(options.minimum_required_version, MIN_SUPPORTED_VERSION);

        let options = CreateOptions::from_json(
            r#"{"minimumRequiredVersion": {"major": 0, "minor": 11, "patch": 0}, "visible": true}"#,
        )
        .unwrap();
        assert_eq!(options.minimum_required_version, Version::new(0, 11, 0));
        assert!(options.visible);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = CreateOptions::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"embedTarget": 42}"#).unwrap();

        let options = CreateOptions::from_file(&path).unwrap();
        assert_eq!(options.embed_target, Some(42));

        let missing = CreateOptions::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
