//! Extension version validation

use anyhow::Result;
use semver::Version;

/// Version suggested for a new extension
pub const DEFAULT_EXTENSION_VERSION: &str = "0.0.1";

/// Parse version string, handling a leading 'v'
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Validate an extension version as typed by the user
pub fn validate_version(version_str: &str) -> Result<(), String> {
    parse_version(version_str)
        .map(|_| ())
        .map_err(|_| "Required. Must match semantic versioning rules.".to_string())
}
