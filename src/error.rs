//! Error types for the bridge.
//!
//! This module defines the error code taxonomy surfaced at the boundary, the
//! main error type used throughout the crate, and the numeric codes that
//! embedders exchange with foreign callers.

use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Something unexpected happened inside the library
    Internal,
    /// The library or the caller reached an inconsistent state
    InvalidState,
    /// One or more arguments were invalid
    InvalidArgument,
    /// Requested minimum version is newer than the library
    VersionTooRecent,
    /// Requested minimum version is no longer supported
    VersionTooOld,
    /// Something already exists
    Duplicate,
    /// Something does not exist
    NotFound,
}

impl ErrorCode {
    /// Numeric value of the code, as exchanged across the boundary
    pub fn as_i32(self) -> i32 {
        match self {
            ErrorCode::Internal => error_codes::INTERNAL,
            ErrorCode::InvalidState => error_codes::INVALID_STATE,
            ErrorCode::InvalidArgument => error_codes::INVALID_ARGUMENT,
            ErrorCode::VersionTooRecent => error_codes::VERSION_TOO_RECENT,
            ErrorCode::VersionTooOld => error_codes::VERSION_TOO_OLD,
            ErrorCode::Duplicate => error_codes::DUPLICATE,
            ErrorCode::NotFound => error_codes::NOT_FOUND,
        }
    }

    /// Look up the code for a numeric value. `OK` has no error code.
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            error_codes::INTERNAL => Some(ErrorCode::Internal),
            error_codes::INVALID_STATE => Some(ErrorCode::InvalidState),
            error_codes::INVALID_ARGUMENT => Some(ErrorCode::InvalidArgument),
            error_codes::VERSION_TOO_RECENT => Some(ErrorCode::VersionTooRecent),
            error_codes::VERSION_TOO_OLD => Some(ErrorCode::VersionTooOld),
            error_codes::DUPLICATE => Some(ErrorCode::Duplicate),
            error_codes::NOT_FOUND => Some(ErrorCode::NotFound),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Internal => write!(f, "INTERNAL"),
            ErrorCode::InvalidState => write!(f, "INVALID_STATE"),
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::VersionTooRecent => write!(f, "VERSION_TOO_RECENT"),
            ErrorCode::VersionTooOld => write!(f, "VERSION_TOO_OLD"),
            ErrorCode::Duplicate => write!(f, "DUPLICATE"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// Main error type for the bridge
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A binding with this name already exists
    #[error("Binding '{name}' already exists")]
    Duplicate {
        /// The binding name
        name: String,
    },

    /// No binding with this name exists
    #[error("Binding '{name}' not found")]
    NotFound {
        /// The binding name
        name: String,
    },

    /// The requested minimum version is below the minimum supported version
    #[error("The specified version is too old: {requested} < {minimum}")]
    VersionTooOld {
        /// Version requested by the caller
        requested: Version,
        /// Oldest version the library still supports
        minimum: Version,
    },

    /// The requested minimum version is above the library version
    #[error("The specified version is too recent: {requested} > {library}")]
    VersionTooRecent {
        /// Version requested by the caller
        requested: Version,
        /// Version of this library
        library: Version,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Engine or other internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Boundary code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Duplicate { .. } => ErrorCode::Duplicate,
            Error::NotFound { .. } => ErrorCode::NotFound,
            Error::VersionTooOld { .. } => ErrorCode::VersionTooOld,
            Error::VersionTooRecent { .. } => ErrorCode::VersionTooRecent,
            Error::Config(_) | Error::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Error::InvalidState(_) => ErrorCode::InvalidState,
            Error::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Create a duplicate binding error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Error::Duplicate { name: name.into() }
    }

    /// Create a binding not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Error::NotFound { name: name.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Map a result to the numeric code surfaced at the boundary.
pub fn status_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => error_codes::OK,
        Err(e) => e.code().as_i32(),
    }
}

/// Numeric error codes
pub mod error_codes {
    /// Success
    pub const OK: i32 = 0;
    /// Internal error
    pub const INTERNAL: i32 = 1000;
    /// Invalid state
    pub const INVALID_STATE: i32 = 1001;
    /// Invalid argument
    pub const INVALID_ARGUMENT: i32 = 1002;
    /// Version too recent
    pub const VERSION_TOO_RECENT: i32 = 2000;
    /// Version too old
    pub const VERSION_TOO_OLD: i32 = 2001;
    /// Already exists
    pub const DUPLICATE: i32 = 2002;
    /// Does not exist
    pub const NOT_FOUND: i32 = 2003;
}
