//! Runtime configuration for the Brokkr CLI
//!
//! All environment-influenced behavior is resolved once at startup into a
//! `RuntimeConfig` that is passed by reference to the package cache, the
//! command dispatcher, and the init pipeline. Nothing mutates the process
//! environment after this point.
//!
//! # Environment Variables
//!
//! - `BROKKR_CLI_HOME`: overrides the CLI home directory (default `~/.brokkr`)
//! - `BROKKR_REGISTRY`: overrides the package registry base URL
//! - `BROKKR_CATALOG_URL`: overrides the template catalog base URL
//! - `BROKKR_TARGET_PATH`: local package override path; the dispatcher skips
//!   install/update and resolves entry points from this path directly

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::get_home_dir;

/// Default CLI home directory name under the user's home
pub const DEFAULT_CLI_HOME: &str = ".brokkr";

/// Store directory name used by the package manager's module-resolution layout.
/// Also the directory name the workspace safety check treats as non-content.
pub const DEPENDENCY_STORE: &str = "node_modules";

/// Subdirectory of the CLI home holding cached template packages
const TEMPLATE_CACHE_DIR: &str = "template";

/// Subdirectory of the CLI home holding cached command packages
const COMMAND_CACHE_DIR: &str = "dependencies";

/// Default package registry
const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default template catalog host
const DEFAULT_CATALOG_URL: &str = "https://api.brokkr.dev";

/// Resolved runtime configuration, constructed once in `main`
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// User home directory
    home_dir: PathBuf,

    /// CLI home directory (`~/.brokkr` unless overridden)
    cli_home: PathBuf,

    /// Package registry base URL
    registry_url: String,

    /// Template catalog base URL
    catalog_url: String,

    /// Local package override path (developer mode)
    target_path_override: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Build a configuration rooted at explicit directories.
    ///
    /// `from_env` is the production path; this constructor serves tests and
    /// embedders that already know where the CLI home lives.
    pub fn new(home_dir: impl Into<PathBuf>, cli_home: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
            cli_home: cli_home.into(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            target_path_override: None,
        }
    }

    /// Resolve configuration from the process environment.
    ///
    /// Fails when the home directory cannot be determined or does not exist,
    /// since every cache path hangs off it.
    pub fn from_env() -> Result<Self> {
        let home_dir = get_home_dir()?;
        if !home_dir.exists() {
            return Err(Error::HomeDirUnavailable);
        }

        let cli_home = std::env::var_os("BROKKR_CLI_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join(DEFAULT_CLI_HOME));

        let registry_url = std::env::var("BROKKR_REGISTRY")
            .unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string());

        let catalog_url = std::env::var("BROKKR_CATALOG_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());

        let target_path_override = std::env::var_os("BROKKR_TARGET_PATH").map(PathBuf::from);

        Ok(Self {
            home_dir,
            cli_home,
            registry_url,
            catalog_url,
            target_path_override,
        })
    }

    /// Override the local package path (a CLI flag wins over the env var)
    pub fn with_target_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.target_path_override = path;
        }
        self
    }

    /// User home directory
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// CLI home directory
    pub fn cli_home(&self) -> &Path {
        &self.cli_home
    }

    /// Package registry base URL
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Template catalog base URL
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Local package override path, if configured
    pub fn target_path_override(&self) -> Option<&Path> {
        self.target_path_override.as_deref()
    }

    /// Install root for cached template packages (`<cli home>/template`)
    pub fn template_cache_dir(&self) -> PathBuf {
        self.cli_home.join(TEMPLATE_CACHE_DIR)
    }

    /// Store directory for cached template packages
    pub fn template_store_dir(&self) -> PathBuf {
        self.template_cache_dir().join(DEPENDENCY_STORE)
    }

    /// Install root for cached command packages (`<cli home>/dependencies`)
    pub fn command_cache_dir(&self) -> PathBuf {
        self.cli_home.join(COMMAND_CACHE_DIR)
    }

    /// Store directory for cached command packages
    pub fn command_store_dir(&self) -> PathBuf {
        self.command_cache_dir().join(DEPENDENCY_STORE)
    }
}
