//! Idempotent tag lifecycle for plugin releases.

use super::GitRepository;
use crate::error::{GitError, Result};
use semver::Version;

/// What an idempotent tag operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    /// The tag was created or pushed
    Created,
    /// The tag was already there; nothing happened
    Skipped,
}

/// Tag name for a plugin release: `<plugin>-<version>`
pub fn plugin_tag_name(plugin: &str, version: &str) -> String {
    format!("{}-{}", plugin, version)
}

impl GitRepository {
    /// Whether `refs/tags/<tag>` exists locally
    pub fn tag_exists_locally(&self, tag: &str) -> Result<bool> {
        self.succeeds(&["rev-parse", "-q", "--verify", &format!("refs/tags/{}", tag)])
    }

    /// Whether `refs/tags/<tag>` exists on `remote`
    pub fn tag_exists_on_remote(&self, tag: &str, remote: &str) -> Result<bool> {
        let refs = self.run(&["ls-remote", "--tags", remote, &format!("refs/tags/{}", tag)])?;
        Ok(!refs.is_empty())
    }

    /// Create the annotated tag `<plugin>-<version>` unless it already exists.
    ///
    /// The tag points at `target` when given, HEAD otherwise.
    pub fn create_tag_if_not_exists(
        &self,
        plugin: &str,
        version: &str,
        target: Option<&str>,
    ) -> Result<TagOutcome> {
        let tag = plugin_tag_name(plugin, version);
        if self.tag_exists_locally(&tag)? {
            log::warn!("Tag {} already exists locally, skipping", tag);
            return Ok(TagOutcome::Skipped);
        }

        let message = format!("{} v{}", plugin, version);
        let mut args = vec!["tag", "-a", tag.as_str(), "-m", message.as_str()];
        if let Some(target) = target {
            args.push(target);
        }
        self.run(&args)?;

        log::info!("Created tag {}", tag);
        Ok(TagOutcome::Created)
    }

    /// Push `refs/tags/<tag>` unless `remote` already has it
    pub fn push_tag_if_not_on_remote(&self, tag: &str, remote: &str) -> Result<TagOutcome> {
        if self.tag_exists_on_remote(tag, remote)? {
            log::warn!("Tag {} already exists on {}, skipping push", tag, remote);
            return Ok(TagOutcome::Skipped);
        }

        let refspec = format!("refs/tags/{}", tag);
        self.run(&["push", remote, &refspec])
            .map_err(|e| GitError::PushFailed {
                reference: refspec.clone(),
                reason: e.to_string(),
            })?;

        log::info!("Pushed tag {} to {}", tag, remote);
        Ok(TagOutcome::Created)
    }

    /// Newest tag of the form `<plugin>-<semver>`, optionally only among
    /// versions strictly below `below`.
    ///
    /// Tags of other plugins sharing the prefix (`foo-bar-1.0.0` for `foo`)
    /// are ignored because their suffix is not a version.
    pub fn get_latest_plugin_tag(&self, plugin: &str, below: Option<&str>) -> Result<Option<String>> {
        let below = below.and_then(|v| Version::parse(v).ok());
        let pattern = format!("{}-*", plugin);
        let listing = self.run(&["tag", "--list", &pattern])?;
        let prefix = format!("{}-", plugin);

        let latest = listing
            .lines()
            .filter_map(|tag| {
                let version = Version::parse(tag.trim().strip_prefix(&prefix)?).ok()?;
                Some((version, tag.trim().to_string()))
            })
            .filter(|(version, _)| below.as_ref().is_none_or(|limit| version < limit))
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, tag)| tag);

        Ok(latest)
    }
}
