//! Version string handling for plugin releases.
//!
//! Every command runs user-supplied versions through [`sanitize_version`] and
//! then gates on [`parse_version`] before touching any file.

use crate::error::{Result, VersionError};
use semver::Version;

/// Strip a leading `v` from a version string.
///
/// Logs a warning when the prefix was present so the operator notices that the
/// tag and `package.json` will use the bare form.
pub fn sanitize_version(input: &str) -> String {
    let trimmed = input.trim();
    match strip_v_prefix(trimmed) {
        Some(bare) => {
            log::warn!("Version '{}' has a 'v' prefix, using '{}'", trimmed, bare);
            bare.to_string()
        }
        None => trimmed.to_string(),
    }
}

/// The version without its `v` prefix, or `None` when there is no prefix.
///
/// [`sanitize_version`] warns exactly when this returns `Some`.
pub fn strip_v_prefix(input: &str) -> Option<&str> {
    input.trim().strip_prefix(['v', 'V'])
}

/// Check that a string is a strict semantic version.
///
/// `major.minor.patch` with optional pre-release and build metadata. No
/// prefix, no missing components, no fourth component.
pub fn validate_version(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Parse a version, mapping failures into a [`VersionError`].
pub fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|e| {
        VersionError::InvalidVersion {
            version: version.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
