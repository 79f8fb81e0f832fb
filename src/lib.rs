//! # Plugin Releaser
//!
//! Release automation for a monorepo of dashboard plugins.
//!
//! Each plugin is a directory with its own `package.json`. The releaser bumps
//! its version, packages it into a tarball, and publishes that tarball as a
//! GitHub release tagged `<plugin>-<version>`, keeping the ArtifactHub
//! metadata sidecar in sync.
//!
//! ## Features
//!
//! - **Idempotent re-runs**: existing tags, releases and assets are detected
//!   and skipped (or overwritten only after confirmation)
//! - **Strict versions**: every command gates on strict semantic versioning
//! - **Pinned releases**: drafts target the exact version-bump commit once it
//!   has reached the remote
//!
//! ## Usage
//!
//! ```bash
//! releaser bump my-plugin 1.2.0
//! releaser package my-plugin --output-dir dist
//! releaser release my-plugin 1.2.0 --publish
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod artifacthub;
pub mod cli;
pub mod error;
pub mod git;
pub mod github;
pub mod npm;
pub mod plugin;
pub mod version;

// Re-export main types for public API
pub use cli::Args;
pub use error::{ReleaseError, Result};
pub use git::GitRepository;
pub use github::{GitHubReleaseManager, ReleaseApi};
pub use npm::NpmRunner;
pub use plugin::PluginInfo;

use std::collections::HashMap;

/// Snapshot of the environment variables the releaser reads.
///
/// Taken once at startup and passed down, so commands never read the process
/// environment directly and tests can supply their own.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build from explicit key/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`; empty values count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Set or replace a variable
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}
