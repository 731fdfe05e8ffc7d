//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Brokkr
#[derive(Error, Debug)]
pub enum Error {
    /// Home directory could not be determined
    #[error("Could not determine the user's home directory")]
    HomeDirUnavailable,

    /// Project name violates the identifier grammar
    #[error("Invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Version string is not valid semver
    #[error("Invalid version format: {version}")]
    InvalidVersion { version: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }
}
