//! Package manifest parsing and entry-file discovery
//!
//! Packages declare their executable entry in the `main` field of
//! `package.json`. The discovery walk ascends from an install location to
//! the nearest directory containing a manifest, which is what makes the
//! store's nested `node_modules` layout load-bearing: a lookup started
//! anywhere inside an installed package finds that package's own manifest
//! first.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Package metadata file name
pub const MANIFEST_FILE: &str = "package.json";

/// The subset of `package.json` the cache cares about
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Load and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Ascend from `start` to the nearest directory containing a manifest.
pub fn find_package_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Resolve the entry file declared by the package nearest to `start`.
///
/// Returns `None` when no manifest is found, the manifest is unreadable, or
/// no `main` field is declared.
pub fn resolve_entry(start: &Path) -> Option<PathBuf> {
    let root = find_package_root(start)?;
    let manifest = match PackageManifest::load(&root.join(MANIFEST_FILE)) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!("unreadable manifest under {}: {}", root.display(), e);
            return None;
        }
    };
    manifest.main.map(|main| root.join(main))
}
