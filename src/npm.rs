//! npm subprocess runner with timeouts.
//!
//! Output is inherited so the operator sees npm's own progress. A child that
//! outlives its timeout is killed and reaped.

use crate::error::{NpmError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default timeout for `npm install`
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default timeout for `npm run <script>`
pub const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Runs npm commands inside a plugin directory
#[derive(Debug, Clone)]
pub struct NpmRunner {
    /// Program to invoke (usually `npm`)
    program: String,
    /// Timeout for `npm install`
    install_timeout: Duration,
    /// Timeout for `npm run`
    script_timeout: Duration,
}

impl Default for NpmRunner {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl NpmRunner {
    /// Runner for the given npm executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            install_timeout: INSTALL_TIMEOUT,
            script_timeout: SCRIPT_TIMEOUT,
        }
    }

    /// Override both timeouts
    pub fn with_timeouts(mut self, install: Duration, script: Duration) -> Self {
        self.install_timeout = install;
        self.script_timeout = script;
        self
    }

    /// Program this runner invokes
    pub fn program(&self) -> &str {
        &self.program
    }

    /// `npm install` in `dir`
    pub fn install(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["install"], self.install_timeout)
    }

    /// `npm run <script>` in `dir`
    pub fn run_script(&self, dir: &Path, script: &str) -> Result<()> {
        self.run(dir, &["run", script], self.script_timeout)
    }

    fn run(&self, dir: &Path, args: &[&str], timeout: Duration) -> Result<()> {
        let program = which::which(&self.program).map_err(|_| NpmError::NotFound {
            program: self.program.clone(),
        })?;
        let command = format!("{} {}", self.program, args.join(" "));
        log::debug!("Running '{}' in {}", command, dir.display());

        let mut child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        match child.wait_timeout(timeout)? {
            Some(status) if status.success() => Ok(()),
            Some(status) => Err(NpmError::Failed {
                command,
                code: status.code().unwrap_or(-1),
            }
            .into()),
            None => {
                // Kill the hanging npm process and reap it.
                let _ = child.kill();
                let _ = child.wait();
                Err(NpmError::TimedOut {
                    command,
                    seconds: timeout.as_secs(),
                }
                .into())
            }
        }
    }
}
