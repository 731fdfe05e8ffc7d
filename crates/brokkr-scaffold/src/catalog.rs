//! Template catalog client
//!
//! The catalog is a pull-only collaborator: one GET returning the list of
//! installable template descriptors. Filtering and selection happen in the
//! pipeline.

use std::time::Duration;

use tracing::debug;

use brokkr_core::RuntimeConfig;

use crate::error::{Error, Result};
use crate::types::TemplateDescriptor;

/// Catalog endpoint path under the configured catalog base URL
const CATALOG_PATH: &str = "/project/template";

/// Catalog request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch the full template catalog
pub async fn fetch_templates(config: &RuntimeConfig) -> Result<Vec<TemplateDescriptor>> {
    let url = format!(
        "{}{}",
        config.catalog_url().trim_end_matches('/'),
        CATALOG_PATH
    );
    debug!("fetching template catalog from {}", url);

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(Error::catalog(format!("HTTP {}", response.status())));
    }

    let templates: Vec<TemplateDescriptor> = response.json().await?;
    debug!("catalog returned {} templates", templates.len());
    Ok(templates)
}
