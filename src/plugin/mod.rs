//! Plugin directory resolution and package.json handling.
//!
//! A plugin is a directory at the repository root with its own `package.json`.
//! Its name and version come from that manifest; tarballs produced by
//! `npm run package` land next to it.

use crate::error::{PluginError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Version assumed when package.json has none
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Name and version of a plugin as read from its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Package name (falls back to the directory name)
    pub name: String,
    /// Package version (falls back to [`DEFAULT_VERSION`])
    pub version: String,
    /// Plugin directory
    pub path: PathBuf,
}

/// Name without an npm scope: `@org/foo` → `foo`
fn unscoped(name: &str) -> &str {
    name.rsplit_once('/').map_or(name, |(_, bare)| bare)
}

/// Resolve the directory of plugin `name` under the repository root
pub fn get_plugin_path(repo_root: &Path, name: &str) -> Result<PathBuf> {
    let path = repo_root.join(name);
    if !path.is_dir() {
        return Err(PluginError::NotFound {
            name: name.to_string(),
            path,
        }
        .into());
    }
    if !path.join("package.json").is_file() {
        return Err(PluginError::MissingPackageJson { path }.into());
    }
    Ok(path)
}

fn read_manifest(path: &Path) -> Result<Map<String, Value>> {
    let manifest = path.join("package.json");
    let content = std::fs::read_to_string(&manifest).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PluginError::MissingPackageJson {
            path: path.to_path_buf(),
        }
        .into(),
        _ => crate::error::ReleaseError::Io(e),
    })?;

    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(PluginError::MalformedPackageJson {
            path: manifest,
            reason: "top-level value is not an object".to_string(),
        }
        .into()),
    }
}

fn write_manifest(path: &Path, manifest: &Map<String, Value>) -> Result<()> {
    let mut content = serde_json::to_string_pretty(manifest)?;
    content.push('\n');
    std::fs::write(path.join("package.json"), content)?;
    Ok(())
}

/// Read name and version from the plugin's package.json
pub fn get_plugin_info(path: &Path) -> Result<PluginInfo> {
    let manifest = read_manifest(path)?;

    let name = manifest
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

    let version = manifest
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_VERSION)
        .to_string();

    Ok(PluginInfo {
        name,
        version,
        path: path.to_path_buf(),
    })
}

/// Rewrite the `version` field of package.json, keeping key order.
///
/// Returns the previous version.
pub fn set_plugin_version(path: &Path, version: &str) -> Result<String> {
    let mut manifest = read_manifest(path)?;
    let previous = manifest
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_VERSION)
        .to_string();

    manifest.insert("version".to_string(), Value::String(version.to_string()));
    write_manifest(path, &manifest)?;
    Ok(previous)
}

/// Whether package.json defines `scripts.<script>`
pub fn has_script(path: &Path, script: &str) -> Result<bool> {
    let manifest = read_manifest(path)?;
    Ok(manifest
        .get("scripts")
        .and_then(Value::as_object)
        .is_some_and(|scripts| scripts.contains_key(script)))
}

/// Tarball filename patterns produced by `npm pack` and the plugin packager
static TARBALL_PATTERNS: LazyLock<[glob::Pattern; 2]> = LazyLock::new(|| {
    ["*.tgz", "*.tar.gz"].map(|p| glob::Pattern::new(p).expect("tarball pattern is valid"))
});

/// Find a packaged tarball for the plugin.
///
/// Candidates are `*.tgz` and `*.tar.gz` files in `path` whose name contains
/// the plugin name. With a version, a candidate containing exactly that
/// version is preferred; otherwise the lexicographically last candidate wins.
pub fn find_tarball(path: &Path, name: &str, version: Option<&str>) -> Result<Option<PathBuf>> {
    let name = unscoped(name);
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            file_name(p).is_some_and(|f| {
                f.contains(name) && TARBALL_PATTERNS.iter().any(|pattern| pattern.matches(f))
            })
        })
        .collect();

    candidates.sort();

    if let Some(version) = version {
        let exact = candidates
            .iter()
            .rev()
            .find(|p| file_name(p).is_some_and(|f| contains_version(f, version)));
        if let Some(tarball) = exact {
            log::debug!("Found tarball {} for version {}", tarball.display(), version);
            return Ok(Some(tarball.clone()));
        }
        if !candidates.is_empty() {
            log::warn!(
                "No tarball for {} mentions version {}, falling back to the latest match",
                name,
                version
            );
        }
    }

    Ok(candidates.pop())
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|f| f.to_str())
}

/// Whether `haystack` contains exactly `version`.
///
/// The match may not be glued to other version text on either side:
/// `1.0.0` matches neither `foo-11.0.0.tgz`, `foo-1.0.0.1.tgz` nor the
/// pre-release `foo-1.0.0-rc.1.tgz`.
pub(crate) fn contains_version(haystack: &str, version: &str) -> bool {
    haystack.match_indices(version).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let rest = &haystack[start + version.len()..];
        let mut after = rest.chars();
        let ends_version = match after.next() {
            None => true,
            Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => !(c.is_ascii_alphanumeric() || c == '-' || c == '+'),
        };
        !before.is_some_and(|c| c.is_ascii_digit() || c == '.') && ends_version
    })
}
