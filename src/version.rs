//! Library version information and version comparison.
//!
//! The library version is taken from the crate manifest and computed once on
//! first access. It never changes for the lifetime of the process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Oldest version whose behavior callers can still request.
pub const MIN_SUPPORTED_VERSION: Version = Version::new(0, 10, 0);

/// First version where windows are no longer shown implicitly.
pub const EXPLICIT_SHOW_VERSION: Version = Version::new(0, 11, 0);

/// A MAJOR.MINOR.PATCH version number
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl Version {
    /// The `0.0.0` version, used as "whatever the library supports"
    pub const ZERO: Version = Version::new(0, 0, 0);

    /// Create a version number
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether this is the `0.0.0` sentinel
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compare two versions.
///
/// Returns a negative number if `a < b`, zero if equal and a positive number
/// if `a > b`.
pub fn compare(a: &Version, b: &Version) -> i32 {
    match a.cmp(b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// The library's version information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// The elements of the version number
    pub version: Version,
    /// Version number in MAJOR.MINOR.PATCH format
    pub version_number: String,
    /// Pre-release label prefixed with "-", or empty
    pub pre_release: String,
    /// Build metadata prefixed with "+", or empty
    pub build_metadata: String,
}

static VERSION_INFO: Lazy<VersionInfo> = Lazy::new(|| {
    let version = Version::new(
        parse_component(env!("CARGO_PKG_VERSION_MAJOR")),
        parse_component(env!("CARGO_PKG_VERSION_MINOR")),
        parse_component(env!("CARGO_PKG_VERSION_PATCH")),
    );
    VersionInfo {
        version,
        version_number: version.to_string(),
        pre_release: prefixed('-', env!("CARGO_PKG_VERSION_PRE")),
        build_metadata: prefixed(
            '+',
            option_env!("WEBVIEW_BRIDGE_BUILD_METADATA").unwrap_or(""),
        ),
    }
});

fn parse_component(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}

fn prefixed(prefix: char, label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, label)
    }
}

/// Get the library's version information.
///
/// Every call returns the same reference.
pub fn version_info() -> &'static VersionInfo {
    &VERSION_INFO
}

/// The library's own version
pub fn library_version() -> Version {
    VERSION_INFO.version
}

/// Whether the library version is at least `major.minor.patch`
pub fn library_version_is_at_least(major: u32, minor: u32, patch: u32) -> bool {
    compare(&library_version(), &Version::new(major, minor, patch)) >= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        let a = Version::new(0, 10, 0);
        assert_eq!(compare(&a, &a), 0);
        assert!(compare(&Version::new(0, 9, 9), &a) < 0);
        assert!(compare(&Version::new(1, 0, 0), &Version::new(0, 99, 99)) > 0);
        assert!(compare(&Version::new(0, 10, 1), &a) > 0);
        assert!(compare(&Version::new(0, 10, 0), &Version::new(0, 10, 1)) < 0);
    }

    #[test]
    fn test_version_info_matches_manifest() {
        let info = version_info();
        assert_eq!(info.version_number, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.version, Version::new(0, 11, 0));
        assert!(info.pre_release.is_empty());
    }

    #[test]
    fn test_version_info_is_singleton() {
        assert!(std::ptr::eq(version_info(), version_info()));
    }

    #[test]
    fn test_library_bounds() {
        assert!(library_version() >= MIN_SUPPORTED_VERSION);
        assert!(library_version_is_at_least(0, 10, 0));
        assert!(!library_version_is_at_least(99, 0, 0));
    }

    #[test]
    fn test_prefixed() {
        assert_eq!(prefixed('-', ""), "");
        assert_eq!(prefixed('-', "test"), "-test");
        assert_eq!(prefixed('+', "gaabbccd"), "+gaabbccd");
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
    }
}
