//! Project metadata validation
//!
//! Project names follow the identifier grammar shared with the template
//! catalog: a leading letter, a trailing letter or digit, and a body of
//! letters and digits joined by single `-` or `_` separators. Versions are
//! semver and stored in normalized form.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::error::{Error, Result};

static NAME_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z](?:[A-Za-z0-9]|[-_][A-Za-z0-9])*$").expect("name grammar regex")
});

/// Validate a project name against the identifier grammar.
///
/// Each of the three rules fails with its own message so interactive
/// prompts can tell the user what to fix.
pub fn validate_project_name(name: &str) -> Result<()> {
    if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(Error::invalid_name(name, "must start with a letter"));
    }
    if !name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::invalid_name(name, "must end with a letter or digit"));
    }
    if !NAME_GRAMMAR.is_match(name) {
        return Err(Error::invalid_name(
            name,
            "may only contain letters, digits, and single '-' or '_' separators",
        ));
    }
    Ok(())
}

/// Whether a name satisfies the identifier grammar
pub fn is_valid_project_name(name: &str) -> bool {
    validate_project_name(name).is_ok()
}

/// Parse a version string as semver and return its normalized form.
///
/// Accepts a leading `v` (`v1.2.0` normalizes to `1.2.0`).
pub fn normalize_version(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare)
        .map(|v| v.to_string())
        .map_err(|_| Error::invalid_version(input))
}
