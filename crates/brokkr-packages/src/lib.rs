//! # brokkr-packages
//!
//! Dynamic package resolution and caching for the Brokkr CLI:
//! - `PackageCache`: locates, installs, and updates versioned packages from
//!   an npm-style registry into a local keyed store
//! - `RegistryClient`: registry metadata fetch and semver resolution
//! - entry-file discovery by directory ascent over `package.json`
//! - `CommandDispatcher`: resolve a command name to a cached package and
//!   execute its entry point in an isolated child process

pub mod cache;
pub mod dispatch;
pub mod error;
pub mod manifest;
pub mod registry;

pub use cache::PackageCache;
pub use dispatch::{CommandDispatcher, COMMAND_PACKAGES};
pub use error::{Error, Result};
pub use manifest::{find_package_root, resolve_entry, PackageManifest};
pub use registry::{PackageMetadata, RegistryClient};
