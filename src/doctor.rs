//! Environment checks behind `forge doctor`.
//! Reports which external tools templates commonly call are installed, and
//! whether the pack lock file has been written yet.

use crate::config::Settings;
use log::debug;
use std::io::ErrorKind;
use std::process::Command;

/// Tools checked by [`run_checks`], each with the argument vector that prints its version.
pub const TOOLS: &[(&str, &[&str])] = &[
    ("git", &["git", "--version"]),
    ("python", &["python3", "--version"]),
    ("go", &["go", "version"]),
    ("cargo", &["cargo", "--version"]),
    ("rustc", &["rustc", "--version"]),
    ("node", &["node", "--version"]),
    ("npm", &["npm", "--version"]),
];

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Missing,
    Warn,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Missing => "missing",
            CheckStatus::Warn => "warn",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
}

impl Check {
    fn new(name: &str, status: CheckStatus, details: impl Into<String>) -> Self {
        Self { name: name.to_string(), status, details: details.into() }
    }
}

/// Runs `argv` and reports the tool as present when it exits successfully.
///
/// The details are the first line the tool printed, on stdout or, failing
/// that, on stderr.
pub fn check_tool(name: &str, argv: &[&str]) -> Check {
    let Some((program, args)) = argv.split_first() else {
        return Check::new(name, CheckStatus::Warn, "no command to run");
    };

    debug!("Checking {name}: {}", argv.join(" "));
    match Command::new(program).args(args).output() {
        Err(e) if e.kind() == ErrorKind::NotFound => Check::new(name, CheckStatus::Missing, ""),
        Err(e) => Check::new(name, CheckStatus::Warn, e.to_string()),
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let details = stdout
                .lines()
                .chain(stderr.lines())
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default();
            Check::new(name, CheckStatus::Ok, details)
        }
        Ok(output) => Check::new(name, CheckStatus::Warn, format!("exited with {}", output.status)),
    }
}

/// Reports whether the pack lock file exists.
pub fn check_lock_file(settings: &Settings) -> Check {
    if settings.lock_path.is_file() {
        Check::new("packs.lock", CheckStatus::Ok, settings.lock_path.display().to_string())
    } else {
        Check::new("packs.lock", CheckStatus::Warn, "not created yet. Run: forge pack add ...")
    }
}

/// Every tool in [`TOOLS`], in order, followed by the lock file check.
pub fn run_checks(settings: &Settings) -> Vec<Check> {
    TOOLS
        .iter()
        .map(|(name, argv)| check_tool(name, argv))
        .chain(std::iter::once(check_lock_file(settings)))
        .collect()
}
