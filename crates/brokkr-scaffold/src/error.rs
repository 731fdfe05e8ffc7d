//! Error types for brokkr-scaffold

use thiserror::Error;

/// Result type alias using brokkr-scaffold's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// The template catalog came back empty
    #[error("No project templates are available")]
    EmptyCatalog,

    /// The catalog endpoint returned an unusable response
    #[error("Template catalog error: {message}")]
    Catalog { message: String },

    /// No catalog template is tagged for the requested kind
    #[error("No templates available for {kind}")]
    NoTemplatesForKind { kind: String },

    /// A declared install/start command is not an allowed package manager
    #[error("Command '{command}' is not allowed here. Allowed: {allowed}")]
    CommandNotWhitelisted { command: String, allowed: String },

    /// A whitelisted command ran and failed
    #[error("Command '{command}' failed: {detail}")]
    CommandFailed { command: String, detail: String },

    /// A custom template package has no discoverable entry file
    #[error("Custom template {template} declares no entry file")]
    MissingEntry { template: String },

    /// A custom template's install script exited non-zero
    #[error("Custom install for {template} failed: {detail}")]
    CustomInstallFailed { template: String, detail: String },

    /// The cached template package carries no staged source tree
    #[error("Template source tree not found at {path}")]
    TemplateSourceMissing { path: String },

    /// A template-declared ignore glob does not parse
    #[error("Invalid ignore pattern: {pattern}")]
    IgnorePattern { pattern: String },

    /// Rendering a single file failed
    #[error("Failed to render {path}: {message}")]
    Render { path: String, message: String },

    /// The interactive prompt backend failed
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// Package cache error
    #[error(transparent)]
    Package(#[from] brokkr_packages::Error),

    /// Core library error
    #[error(transparent)]
    Core(#[from] brokkr_core::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a no-templates-for-kind error
    pub fn no_templates_for_kind(kind: impl Into<String>) -> Self {
        Self::NoTemplatesForKind { kind: kind.into() }
    }

    /// Create a command not whitelisted error
    pub fn command_not_whitelisted(command: impl Into<String>, allowed: &[&str]) -> Self {
        Self::CommandNotWhitelisted {
            command: command.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            detail: detail.into(),
        }
    }

    /// Create a missing entry error
    pub fn missing_entry(template: impl Into<String>) -> Self {
        Self::MissingEntry {
            template: template.into(),
        }
    }

    /// Create a custom install failed error
    pub fn custom_install_failed(template: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CustomInstallFailed {
            template: template.into(),
            detail: detail.into(),
        }
    }

    /// Create a template source missing error
    pub fn template_source_missing(path: impl Into<String>) -> Self {
        Self::TemplateSourceMissing { path: path.into() }
    }

    /// Create an ignore pattern error
    pub fn ignore_pattern(pattern: impl Into<String>) -> Self {
        Self::IgnorePattern {
            pattern: pattern.into(),
        }
    }

    /// Create a render error
    pub fn render(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }
}
