//! Git operations for plugin releases.
//!
//! All operations shell out to the system `git` binary from the repository
//! root: status checks, version-bump commits, changelogs and the idempotent
//! tag lifecycle.

mod changelog;
mod repository;
mod tags;

pub use changelog::NO_CHANGES_SENTINEL;
pub use repository::{GitRepository, commit_message, get_repo_root};
pub use tags::{TagOutcome, plugin_tag_name};
