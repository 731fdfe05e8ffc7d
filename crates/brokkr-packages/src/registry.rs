//! Registry metadata fetch and semver resolution
//!
//! The registry speaks the npm metadata protocol: `GET <registry>/<name>`
//! returns a document carrying `dist-tags` and a `versions` map. Resolution
//! handles three spec shapes:
//! - `latest` resolves through the dist-tag
//! - a literal version must exist in the published set
//! - anything else parses as a semver range and picks the maximum
//!   satisfying published version

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use semver::{Version, VersionReq};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Registry request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Dist-tag consulted for `latest` specs
const LATEST_TAG: &str = "latest";

/// Registry metadata document for a single package
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    pub name: String,

    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,

    /// Published versions; only the keys matter for resolution
    #[serde(default)]
    pub versions: BTreeMap<String, serde_json::Value>,
}

impl PackageMetadata {
    /// All published versions that parse as semver, ascending
    fn published_versions(&self) -> Vec<Version> {
        let mut versions: Vec<Version> = self
            .versions
            .keys()
            .filter_map(|raw| match Version::parse(raw) {
                Ok(v) => Some(v),
                Err(_) => {
                    debug!("skipping unparseable published version '{}'", raw);
                    None
                }
            })
            .collect();
        versions.sort();
        versions
    }
}

/// HTTP client for an npm-style package registry
pub struct RegistryClient {
    base_url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client against a registry base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Fetch the metadata document for a package
    pub async fn metadata(&self, name: &str) -> Result<PackageMetadata> {
        // Scoped names are url-encoded the way npm clients do it
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            name.replace('/', "%2F")
        );
        debug!("fetching registry metadata from {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::registry(
                name,
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(response.json().await?)
    }

    /// Resolve a version spec to a concrete published version
    pub async fn resolve(&self, name: &str, spec: &str) -> Result<Version> {
        let metadata = self.metadata(name).await?;
        pick_version(name, spec, &metadata)
    }

    /// Resolve the version behind the `latest` dist-tag
    pub async fn latest(&self, name: &str) -> Result<Version> {
        self.resolve(name, LATEST_TAG).await
    }
}

/// Pick the published version matching `spec`.
fn pick_version(name: &str, spec: &str, metadata: &PackageMetadata) -> Result<Version> {
    if spec == LATEST_TAG {
        let tagged = metadata
            .dist_tags
            .get(LATEST_TAG)
            .ok_or_else(|| Error::version_not_found(name, spec))?;
        return Version::parse(tagged)
            .map_err(|_| Error::registry(name, format!("unparseable dist-tag '{tagged}'")));
    }

    // A literal version is an exact match against the published set
    if let Ok(exact) = Version::parse(spec) {
        return if metadata.versions.contains_key(spec) {
            Ok(exact)
        } else {
            Err(Error::version_not_found(name, spec))
        };
    }

    let req = VersionReq::parse(spec).map_err(|_| Error::invalid_version_spec(spec))?;
    metadata
        .published_versions()
        .into_iter()
        .rev()
        .find(|v| req.matches(v))
        .ok_or_else(|| Error::version_not_found(name, spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_fixture() -> PackageMetadata {
        serde_json::from_str(
            r#"{
                "name": "@brokkr/create",
                "dist-tags": { "latest": "1.2.0" },
                "versions": {
                    "0.9.1": {},
                    "1.0.0": {},
                    "1.1.3": {},
                    "1.2.0": {},
                    "2.0.0-beta.1": {}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn latest_resolves_through_dist_tag() {
        let meta = metadata_fixture();
        let v = pick_version("@brokkr/create", "latest", &meta).unwrap();
        assert_eq!(v, Version::new(1, 2, 0));
    }

    #[test]
    fn literal_version_must_be_published() {
        let meta = metadata_fixture();
        assert_eq!(
            pick_version("@brokkr/create", "1.1.3", &meta).unwrap(),
            Version::parse("1.1.3").unwrap()
        );
        assert!(matches!(
            pick_version("@brokkr/create", "1.1.4", &meta),
            Err(Error::VersionNotFound { .. })
        ));
    }

    #[test]
    fn range_picks_max_satisfying() {
        let meta = metadata_fixture();
        assert_eq!(
            pick_version("@brokkr/create", "^1.0.0", &meta).unwrap(),
            Version::new(1, 2, 0)
        );
        assert_eq!(
            pick_version("@brokkr/create", ">=0.9, <1.2", &meta).unwrap(),
            Version::parse("1.1.3").unwrap()
        );
    }

    #[test]
    fn unsatisfiable_range_and_bad_spec_fail() {
        let meta = metadata_fixture();
        assert!(matches!(
            pick_version("@brokkr/create", "^3.0.0", &meta),
            Err(Error::VersionNotFound { .. })
        ));
        assert!(matches!(
            pick_version("@brokkr/create", "not a spec", &meta),
            Err(Error::InvalidVersionSpec { .. })
        ));
    }
}
