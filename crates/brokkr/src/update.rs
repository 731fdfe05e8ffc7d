//! Startup check for a newer CLI release
//!
//! The CLI ships through the same registry its packages come from, so the
//! check is one metadata fetch. Best-effort only: failures are logged at
//! debug level and never block a command.

use semver::Version;
use tracing::{debug, warn};

use brokkr_core::RuntimeConfig;
use brokkr_packages::RegistryClient;

/// Registry package the CLI itself ships as
const CLI_PACKAGE: &str = "@brokkr/cli";

/// Warn when the registry carries a newer release than this binary
pub async fn check_for_newer_release(config: &RuntimeConfig) {
    let Ok(current) = Version::parse(env!("CARGO_PKG_VERSION")) else {
        return;
    };

    let latest = async {
        RegistryClient::new(config.registry_url())?
            .latest(CLI_PACKAGE)
            .await
    };

    match latest.await {
        Ok(latest) if latest > current => {
            warn!(
                "a newer brokkr release is available: {latest} (you have {current}). \
                 Update with: npm install -g {CLI_PACKAGE}"
            );
        }
        Ok(_) => {}
        Err(e) => debug!("release check skipped: {}", e),
    }
}
