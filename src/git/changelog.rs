//! Per-plugin changelog derived from commit history.

use super::GitRepository;
use crate::error::Result;
use std::path::Path;

/// Returned when a plugin has no commits since its last release
pub const NO_CHANGES_SENTINEL: &str = "No changes found";

impl GitRepository {
    /// Commits touching the plugin directory since its last release tag.
    ///
    /// With `version`, the last release is the newest tag below it, so the
    /// tag of the version being released (or a later one) never empties the
    /// log. Without a prior tag every commit touching the directory is
    /// listed. The result is one `- <subject> (<short sha>)` line per commit,
    /// or [`NO_CHANGES_SENTINEL`].
    pub fn get_changelog_for_plugin(
        &self,
        plugin: &str,
        plugin_dir: &Path,
        version: Option<&str>,
    ) -> Result<String> {
        if !self.has_commits()? {
            return Ok(NO_CHANGES_SENTINEL.to_string());
        }

        let dir = self.pathspec(plugin_dir);
        let log = match self.get_latest_plugin_tag(plugin, version)? {
            Some(tag) => {
                log::debug!("Changelog for {} since {}", plugin, tag);
                let range = format!("{}...HEAD", tag);
                self.run(&[
                    "log",
                    "--format=%h %s",
                    "--no-merges",
                    "--cherry-pick",
                    "--right-only",
                    &range,
                    "--",
                    &dir,
                ])?
            }
            None => {
                log::debug!("No previous tag for {}, listing full history", plugin);
                self.run(&["log", "--format=%h %s", "--no-merges", "--", &dir])?
            }
        };

        Ok(format_changelog(&log))
    }
}

/// Render `<sha> <subject>` lines as a bullet list
pub(crate) fn format_changelog(log: &str) -> String {
    let entries: Vec<String> = log
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(' ') {
            Some((sha, subject)) => format!("- {} ({})", subject.trim(), sha),
            None => format!("- {}", line.trim()),
        })
        .collect();

    if entries.is_empty() {
        NO_CHANGES_SENTINEL.to_string()
    } else {
        entries.join("\n")
    }
}
