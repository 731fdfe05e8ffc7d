//! Error types for brokkr-packages

use thiserror::Error;

/// Result type alias using brokkr-packages's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Package resolution and dispatch error types
#[derive(Error, Debug)]
pub enum Error {
    /// The external package manager binary is not on PATH
    #[error("Package manager '{manager}' not found. Please ensure it is installed and in PATH")]
    ManagerNotFound { manager: String },

    /// Package installation failed
    #[error("Failed to install {package}: {detail}")]
    Install { package: String, detail: String },

    /// Package update failed
    #[error("Failed to update {package}: {detail}")]
    Update { package: String, detail: String },

    /// A resolved package declares no entry file
    #[error("Package {package} declares no entry file")]
    MissingEntry { package: String },

    /// Dispatcher received a command with no registry mapping
    #[error("Unknown command '{command}'. Known commands: {known}")]
    UnknownCommand { command: String, known: String },

    /// Entry-point execution failed to spawn
    #[error("Failed to execute {command}: {message}")]
    Exec { command: String, message: String },

    /// Registry returned an unusable response
    #[error("Registry error for {package}: {message}")]
    Registry { package: String, message: String },

    /// No version satisfies the requested spec
    #[error("No version of {package} satisfies '{spec}'")]
    VersionNotFound { package: String, spec: String },

    /// The requested version spec is not parseable
    #[error("Invalid version spec: {spec}")]
    InvalidVersionSpec { spec: String },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a manager not found error
    pub fn manager_not_found(manager: impl Into<String>) -> Self {
        Self::ManagerNotFound {
            manager: manager.into(),
        }
    }

    /// Create an install error
    pub fn install(package: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Install {
            package: package.into(),
            detail: detail.into(),
        }
    }

    /// Create an update error
    pub fn update(package: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Update {
            package: package.into(),
            detail: detail.into(),
        }
    }

    /// Create a missing entry error
    pub fn missing_entry(package: impl Into<String>) -> Self {
        Self::MissingEntry {
            package: package.into(),
        }
    }

    /// Create an unknown command error
    pub fn unknown_command(command: impl Into<String>, known: &[&str]) -> Self {
        Self::UnknownCommand {
            command: command.into(),
            known: known.join(", "),
        }
    }

    /// Create an exec error
    pub fn exec(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Exec {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a registry error
    pub fn registry(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registry {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Create a version not found error
    pub fn version_not_found(package: impl Into<String>, spec: impl Into<String>) -> Self {
        Self::VersionNotFound {
            package: package.into(),
            spec: spec.into(),
        }
    }

    /// Create an invalid version spec error
    pub fn invalid_version_spec(spec: impl Into<String>) -> Self {
        Self::InvalidVersionSpec { spec: spec.into() }
    }
}
