//! Command dispatch through remote packages
//!
//! Every non-builtin CLI command is implemented by a registry-distributed
//! package. Dispatch resolves the command name through a static registry,
//! makes sure the package is cached (install-if-absent, else update), then
//! executes its entry file in a freshly spawned child process with
//! inherited standard I/O. The parent mirrors the child's exit code.
//!
//! The child is handed its invocation as data: positional arguments first,
//! then a single JSON argument carrying the option bag. Entry modules read
//! it from `process.argv`; no executable source strings are ever built.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use brokkr_core::utils::host_command;
use brokkr_core::RuntimeConfig;

use crate::cache::PackageCache;
use crate::error::{Error, Result};

/// Runtime used to execute package entry files
const ENTRY_RUNTIME: &str = "node";

/// Static mapping of command names to their implementing packages
pub const COMMAND_PACKAGES: &[(&str, &str)] = &[
    ("init", "@brokkr/create"),
    ("add", "@brokkr/add"),
    ("publish", "@brokkr/publish"),
];

/// Dispatches logical command names to cached package entry points
pub struct CommandDispatcher<'a> {
    config: &'a RuntimeConfig,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a dispatcher over the resolved runtime configuration
    pub fn new(config: &'a RuntimeConfig) -> Self {
        Self { config }
    }

    /// Look up the package implementing a command
    pub fn package_for(command: &str) -> Result<&'static str> {
        COMMAND_PACKAGES
            .iter()
            .find(|(name, _)| *name == command)
            .map(|(_, package)| *package)
            .ok_or_else(|| {
                let known: Vec<&str> = COMMAND_PACKAGES.iter().map(|(name, _)| *name).collect();
                Error::unknown_command(command, &known)
            })
    }

    /// Resolve, cache, and execute a command.
    ///
    /// Returns the child's exit code. A package that resolves no entry
    /// file is an explicit no-op: logged, exit code 0.
    pub async fn dispatch(
        &self,
        command: &str,
        args: &[String],
        options: Map<String, Value>,
    ) -> Result<i32> {
        let package = Self::package_for(command)?;

        let cache = if let Some(override_path) = self.config.target_path_override() {
            // Developer mode: the package is already materialized locally,
            // skip install/update entirely
            debug!(
                "resolving {} from local override {}",
                package,
                override_path.display()
            );
            PackageCache::new(package, "latest", override_path)
        } else {
            let mut cache = PackageCache::new(package, "latest", self.config.command_cache_dir())
                .with_store_dir(self.config.command_store_dir())
                .with_registry(self.config.registry_url());
            if cache.exists().await {
                cache.update().await?;
            } else {
                cache.install().await?;
            }
            cache
        };

        let Some(entry) = cache.entry_path() else {
            // Ambiguous in the original implementation; preserved as a
            // logged no-op pending clarification
            warn!("{} resolved no entry file, nothing to execute", package);
            return Ok(0);
        };

        let payload = Value::Object(strip_reserved_keys(options)).to_string();
        execute_entry(&entry, args, &payload).await
    }
}

/// Drop internal bookkeeping keys before the option bag crosses the
/// process boundary (`_`-prefixed keys and the parent back-reference).
pub fn strip_reserved_keys(options: Map<String, Value>) -> Map<String, Value> {
    options
        .into_iter()
        .filter(|(key, _)| !key.starts_with('_') && key != "parent")
        .collect()
}

/// Spawn the entry runtime on a resolved entry file.
///
/// Standard I/O is inherited, so the child owns the terminal until it
/// exits; only the exit code is observable.
async fn execute_entry(entry: &Path, args: &[String], payload: &str) -> Result<i32> {
    debug!("executing {} via {}", entry.display(), ENTRY_RUNTIME);

    let status = host_command(ENTRY_RUNTIME)
        .arg(entry)
        .args(args)
        .arg(payload)
        .status()
        .await
        .map_err(|e| Error::exec(entry.display().to_string(), e.to_string()))?;

    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_resolve_to_packages() {
        assert_eq!(
            CommandDispatcher::package_for("init").unwrap(),
            "@brokkr/create"
        );
    }

    #[test]
    fn unknown_command_reports_known_names() {
        let err = CommandDispatcher::package_for("destroy").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("destroy"));
        for (name, _) in COMMAND_PACKAGES {
            assert!(message.contains(name), "missing '{name}' in: {message}");
        }
    }

    #[test]
    fn reserved_keys_are_stripped() {
        let mut options = Map::new();
        options.insert("force".into(), Value::Bool(true));
        options.insert("_internal".into(), Value::String("x".into()));
        options.insert("parent".into(), Value::String("cli".into()));
        options.insert("registry".into(), Value::String("https://r".into()));

        let cleaned = strip_reserved_keys(options);
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.contains_key("force"));
        assert!(cleaned.contains_key("registry"));
    }
}
