//! ArtifactHub metadata sidecar (`artifacthub-pkg.yml`).
//!
//! The catalog reads the archive URL and checksum of each plugin release from
//! annotations in this file. The document is edited in place so keys the
//! releaser does not own are kept.

use crate::error::Result;
use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

/// File name of the metadata sidecar inside a plugin directory
pub const METADATA_FILE: &str = "artifacthub-pkg.yml";

/// Annotation holding the tarball download URL
pub const ARCHIVE_URL_ANNOTATION: &str = "headlamp/plugin/archive-url";

/// Annotation holding `SHA256:<hex>` of the tarball
pub const ARCHIVE_CHECKSUM_ANNOTATION: &str = "headlamp/plugin/archive-checksum";

/// Loaded `artifacthub-pkg.yml`
#[derive(Debug, Clone)]
pub struct ArtifactHubMetadata {
    path: PathBuf,
    document: Mapping,
}

impl ArtifactHubMetadata {
    /// Location of the sidecar for a plugin directory
    pub fn path_for(plugin_dir: &Path) -> PathBuf {
        plugin_dir.join(METADATA_FILE)
    }

    /// Load the sidecar if the plugin has one
    pub fn load(plugin_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_for(plugin_dir);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let document = match serde_yaml::from_str::<Value>(&content)? {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            other => {
                return Err(anyhow::anyhow!(
                    "{} must contain a mapping, found {:?}",
                    path.display(),
                    other
                )
                .into());
            }
        };

        Ok(Some(Self { path, document }))
    }

    /// File this metadata was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `version` field, if set
    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    /// Value of an annotation, if set
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.document
            .get("annotations")
            .and_then(Value::as_mapping)
            .and_then(|a| a.get(key))
            .and_then(Value::as_str)
    }

    /// Record a new release: version, archive URL, checksum and timestamp
    pub fn update_release(&mut self, version: &str, archive_url: &str, sha256: &str) {
        self.document
            .insert("version".into(), Value::String(version.to_string()));
        self.document.insert(
            "createdAt".into(),
            Value::String(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        );

        if !self.document.get("annotations").is_some_and(Value::is_mapping) {
            self.document
                .insert("annotations".into(), Value::Mapping(Mapping::new()));
        }
        if let Some(Value::Mapping(annotations)) = self.document.get_mut("annotations") {
            annotations.insert(
                ARCHIVE_URL_ANNOTATION.into(),
                Value::String(archive_url.to_string()),
            );
            annotations.insert(
                ARCHIVE_CHECKSUM_ANNOTATION.into(),
                Value::String(format!("SHA256:{}", sha256)),
            );
        }
    }

    /// Write the document back to disk
    pub fn save(&self) -> Result<()> {
        let content = serde_yaml::to_string(&self.document)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// SHA-256 of a file as lowercase hex
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}
