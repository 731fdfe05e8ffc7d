//! Versioned package cache
//!
//! Packages are cached under a store directory in a keyed layout that
//! mirrors the package manager's own module-resolution convention:
//!
//! ```text
//! <store>/<name with '/' → '+'>@<version>/node_modules/<name>/package.json
//! ```
//!
//! The keyed directory is the install prefix handed to the package manager,
//! so the nested `node_modules/<name>` tree is produced by a real install
//! and entry-file lookups by directory ascent (see `manifest`) land on the
//! package's own manifest. The store outlives the process; concurrent and
//! future invocations reuse it by `(name, version)` key.
//!
//! With no store directory configured the cache runs in local mode: the
//! package is assumed already materialized at `target_path` (developer
//! override) and install/update become no-ops.

use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{debug, info};
use which::which;

use brokkr_core::utils::host_command;

use crate::error::{Error, Result};
use crate::manifest::{self, MANIFEST_FILE};
use crate::registry::RegistryClient;

/// External package manager used to materialize store trees
const PACKAGE_MANAGER: &str = "npm";

/// A single package's view of the on-disk cache
pub struct PackageCache {
    /// Package name, possibly scoped (`@brokkr/create`)
    name: String,

    /// Requested version: literal, range, or `latest`
    version_spec: String,

    /// Concrete version once resolved against the registry
    resolved: Option<Version>,

    /// Install root (local mode) or cache root the store hangs off
    target_path: PathBuf,

    /// Keyed store directory; `None` selects local mode
    store_dir: Option<PathBuf>,

    /// Registry base URL for version resolution and installs
    registry_url: String,
}

impl PackageCache {
    /// Create a cache handle in local mode
    pub fn new(
        name: impl Into<String>,
        version_spec: impl Into<String>,
        target_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version_spec: version_spec.into(),
            resolved: None,
            target_path: target_path.into(),
            store_dir: None,
            registry_url: "https://registry.npmjs.org".to_string(),
        }
    }

    /// Switch to cache-isolated mode rooted at `store_dir`
    pub fn with_store_dir(mut self, store_dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(store_dir.into());
        self
    }

    /// Override the registry base URL
    pub fn with_registry(mut self, registry_url: impl Into<String>) -> Self {
        self.registry_url = registry_url.into();
        self
    }

    /// Package name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concrete version, once `resolve`/`exists`/`install` has run
    pub fn resolved_version(&self) -> Option<&Version> {
        self.resolved.as_ref()
    }

    /// Store key for a concrete version (`@scope/pkg` → `@scope+pkg@1.0.0`)
    fn store_key(&self, version: &Version) -> String {
        format!("{}@{}", self.name.replace('/', "+"), version)
    }

    /// Keyed directory acting as the package manager's install prefix
    fn version_dir(&self, store: &Path, version: &Version) -> PathBuf {
        store.join(self.store_key(version))
    }

    /// Installed package root inside the keyed directory
    fn package_dir(&self, store: &Path, version: &Version) -> PathBuf {
        self.version_dir(store, version)
            .join("node_modules")
            .join(&self.name)
    }

    fn manifest_path(&self, store: &Path, version: &Version) -> PathBuf {
        self.package_dir(store, version).join(MANIFEST_FILE)
    }

    /// Resolve the version spec to a concrete version.
    ///
    /// Literal versions short-circuit without touching the registry;
    /// `latest` and ranges ask the registry. The result is memoized.
    pub async fn resolve(&mut self) -> Result<Version> {
        if let Some(version) = &self.resolved {
            return Ok(version.clone());
        }
        let version = match Version::parse(&self.version_spec) {
            Ok(literal) => literal,
            Err(_) => {
                RegistryClient::new(&self.registry_url)?
                    .resolve(&self.name, &self.version_spec)
                    .await?
            }
        };
        debug!("{} resolved to {}", self.name, version);
        self.resolved = Some(version.clone());
        Ok(version)
    }

    /// Whether the resolved version is present in the cache.
    ///
    /// Never errors: any resolution or lookup failure reports `false`.
    pub async fn exists(&mut self) -> bool {
        let Some(store) = self.store_dir.clone() else {
            return self.target_path.exists();
        };
        match self.resolve().await {
            Ok(version) => self.manifest_path(&store, &version).is_file(),
            Err(e) => {
                debug!("existence check for {} failed: {}", self.name, e);
                false
            }
        }
    }

    /// Install the resolved version into the store.
    ///
    /// No-op in local mode. Callers gate on `exists()`; a re-run after a
    /// successful install finds the manifest and skips the manager.
    pub async fn install(&mut self) -> Result<()> {
        let Some(store) = self.store_dir.clone() else {
            debug!("{} is a local package, skipping install", self.name);
            return Ok(());
        };
        let version = self.resolve().await?;
        if self.manifest_path(&store, &version).is_file() {
            debug!("{}@{} already cached", self.name, version);
            return Ok(());
        }
        self.run_manager_install(&store, &version).await
    }

    /// Update to the newest version satisfying the requested spec.
    ///
    /// Re-resolves against the registry and installs the newest version if
    /// its keyed directory is absent. Never downgrades: a registry answer
    /// older than the already-resolved version is ignored.
    pub async fn update(&mut self) -> Result<()> {
        let Some(store) = self.store_dir.clone() else {
            debug!("{} is a local package, skipping update", self.name);
            return Ok(());
        };
        // A pinned literal version has nothing to update to
        let newest = match Version::parse(&self.version_spec) {
            Ok(literal) => literal,
            Err(_) => {
                RegistryClient::new(&self.registry_url)?
                    .resolve(&self.name, &self.version_spec)
                    .await?
            }
        };

        if let Some(current) = &self.resolved {
            if newest <= *current {
                debug!("{} already at {} (newest {})", self.name, current, newest);
                return Ok(());
            }
        }

        if !self.manifest_path(&store, &newest).is_file() {
            info!("updating {} to {}", self.name, newest);
            self.run_manager_install(&store, &newest)
                .await
                .map_err(|e| match e {
                    Error::Install { package, detail } => Error::Update { package, detail },
                    other => other,
                })?;
        }
        self.resolved = Some(newest);
        Ok(())
    }

    /// Root directory of the materialized package
    pub fn package_root(&self) -> Option<PathBuf> {
        match (&self.store_dir, &self.resolved) {
            (Some(store), Some(version)) => Some(self.package_dir(store, version)),
            (Some(_), None) => None,
            (None, _) => Some(self.target_path.clone()),
        }
    }

    /// Absolute path to the package's declared entry file, or `None` when
    /// no manifest or no `main` field can be found.
    pub fn entry_path(&self) -> Option<PathBuf> {
        manifest::resolve_entry(&self.package_root()?)
    }

    /// Shell out to the package manager to materialize `name@version`
    async fn run_manager_install(&self, store: &Path, version: &Version) -> Result<()> {
        which(PACKAGE_MANAGER).map_err(|_| Error::manager_not_found(PACKAGE_MANAGER))?;

        let prefix = self.version_dir(store, version);
        tokio::fs::create_dir_all(&prefix).await?;

        let spec = format!("{}@{}", self.name, version);
        info!("installing {} into {}", spec, prefix.display());

        let status = host_command(PACKAGE_MANAGER)
            .arg("install")
            .arg(&spec)
            .arg("--prefix")
            .arg(&prefix)
            .arg("--registry")
            .arg(&self.registry_url)
            .arg("--no-audit")
            .arg("--no-fund")
            .arg("--loglevel")
            .arg("error")
            .status()
            .await
            .map_err(|e| Error::install(&self.name, e.to_string()))?;

        if !status.success() {
            return Err(Error::install(
                &self.name,
                format!("package manager exited with {status}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fabricate the store tree a successful install produces
    fn stage_package(store: &Path, name: &str, version: &str, main: &str) -> PathBuf {
        let key = format!("{}@{}", name.replace('/', "+"), version);
        let pkg_dir = store.join(key).join("node_modules").join(name);
        std::fs::create_dir_all(&pkg_dir).unwrap();
        std::fs::write(
            pkg_dir.join(MANIFEST_FILE),
            format!(r#"{{"name": "{name}", "version": "{version}", "main": "{main}"}}"#),
        )
        .unwrap();
        let main_path = pkg_dir.join(main);
        if let Some(parent) = main_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(main_path, "module.exports = () => {};\n").unwrap();
        pkg_dir
    }

    #[tokio::test]
    async fn cached_package_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = tmp.path().join("node_modules");
        stage_package(&store, "@brokkr/create", "1.2.0", "lib/index.js");

        let mut cache = PackageCache::new("@brokkr/create", "1.2.0", tmp.path())
            .with_store_dir(&store);

        assert!(cache.exists().await);
        let entry = cache.entry_path().unwrap();
        assert!(entry.ends_with("lib/index.js"));
        assert!(entry.is_file());
    }

    #[tokio::test]
    async fn missing_version_reports_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = tmp.path().join("node_modules");
        stage_package(&store, "@brokkr/create", "1.2.0", "lib/index.js");

        let mut cache = PackageCache::new("@brokkr/create", "2.0.0", tmp.path())
            .with_store_dir(&store);
        assert!(!cache.exists().await);
        assert!(cache.entry_path().is_none());
    }

    #[tokio::test]
    async fn local_mode_resolves_from_target_path() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(MANIFEST_FILE),
            r#"{"name": "dev-pkg", "version": "0.0.1", "main": "index.js"}"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join("index.js"), "").unwrap();

        let mut cache = PackageCache::new("dev-pkg", "latest", tmp.path());
        assert!(cache.exists().await);
        // Install and update are no-ops without a store
        cache.install().await.unwrap();
        cache.update().await.unwrap();
        assert!(cache.entry_path().unwrap().ends_with("index.js"));
    }

    #[test]
    fn store_key_flattens_scoped_names() {
        let cache = PackageCache::new("@brokkr/create", "1.0.0", "/tmp/x");
        assert_eq!(
            cache.store_key(&Version::new(1, 0, 0)),
            "@brokkr+create@1.0.0"
        );
    }
}
