//! Shared helper functions for command execution.

use crate::EnvConfig;
use crate::error::Result;
use crate::git::GitRepository;
use crate::npm::NpmRunner;

/// Environment variable overriding the npm executable
pub(super) const NPM_PROGRAM_VAR: &str = "RELEASER_NPM";

/// Open the repository containing the current directory
pub(super) fn open_repository() -> Result<GitRepository> {
    let cwd = std::env::current_dir()?;
    GitRepository::discover(&cwd)
}

/// npm runner honouring `RELEASER_NPM`
pub(super) fn npm_runner(env: &EnvConfig) -> NpmRunner {
    match env.get(NPM_PROGRAM_VAR) {
        Some(program) => NpmRunner::new(program),
        None => NpmRunner::default(),
    }
}

/// Prompt user for confirmation with y/n input
pub(super) fn prompt_confirmation(prompt: &str) -> std::io::Result<bool> {
    use std::io::Write;

    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(matches!(response.as_str(), "y" | "yes"))
}

/// Human readable file size
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
