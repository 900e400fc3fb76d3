//! Diff retrieval module
//!
//! This module provides the diff-retrieval abstraction consumed by the log
//! parser. The production backend shells out to the `svn` client; a canned
//! in-memory backend serves tests, examples, and benchmarks so the core can
//! run without network access.

use std::collections::HashMap;
use std::process::Command;

use thiserror::Error;

/// Retrieval errors reported by a diff backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backend command ran but reported failure, e.g. the path did not
    /// exist at one of the two revisions
    #[error("command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The backend command could not be executed at all
    #[error("IO error executing command '{command}': {error}")]
    Io { command: String, error: String },

    /// No diff is available for the requested path and revision pair
    #[error("no diff available for '{path}' between revisions {from} and {to}")]
    Unavailable { path: String, from: u64, to: u64 },
}

/// Source of raw diff text between two revisions of one path
pub trait DiffProvider {
    /// Fetch the unified-diff text for `path` between `from` and `to`
    fn fetch_diff(&self, path: &str, from: u64, to: u64) -> Result<String, ProviderError>;
}

/// Diff backend that executes the `svn` command-line client
#[derive(Debug, Clone)]
pub struct SvnDiffProvider {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl SvnDiffProvider {
    /// Create a provider for the given repository base URL
    ///
    /// The base URL is prepended verbatim to the paths found in the log.
    pub fn new(base_url: impl Into<String>) -> Self {
        SvnDiffProvider {
            base_url: base_url.into(),
            username: None,
            password: None,
        }
    }

    /// Add a username for repository authentication
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Add a password for repository authentication
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Build the argument list for one diff invocation
    ///
    /// Credentials are never cached by the client: the invocation always
    /// carries `--non-interactive` and `--no-auth-cache`.
    fn diff_args(&self, path: &str, from: u64, to: u64) -> Vec<String> {
        let mut args = vec![
            "diff".to_owned(),
            "-r".to_owned(),
            format!("{from}:{to}"),
            format!("{}{}", self.base_url, path),
            "--non-interactive".to_owned(),
            "--no-auth-cache".to_owned(),
        ];
        if let Some(username) = &self.username {
            args.push("--username".to_owned());
            args.push(username.clone());
        }
        if let Some(password) = &self.password {
            args.push("--password".to_owned());
            args.push(password.clone());
        }
        args
    }

    /// Human-readable command line for error messages, without credentials
    fn display_command(&self, path: &str, from: u64, to: u64) -> String {
        format!("svn diff -r {from}:{to} {}{path}", self.base_url)
    }

    /// Execute one diff command and capture its output
    fn execute_diff_command(
        &self,
        path: &str,
        from: u64,
        to: u64,
    ) -> Result<std::process::Output, ProviderError> {
        Command::new("svn")
            .args(self.diff_args(path, from, to))
            .output()
            .map_err(|e| ProviderError::Io {
                command: self.display_command(path, from, to),
                error: e.to_string(),
            })
    }

    /// Map command output to diff text or a retrieval error
    fn parse_diff_output(
        &self,
        output: std::process::Output,
        path: &str,
        from: u64,
        to: u64,
    ) -> Result<String, ProviderError> {
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            exit_code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ProviderError::CommandFailed {
                    command: self.display_command(path, from, to),
                    exit_code: exit_code.unwrap_or(-1),
                    stderr: stderr.trim().to_owned(),
                })
            }
        }
    }
}

impl DiffProvider for SvnDiffProvider {
    fn fetch_diff(&self, path: &str, from: u64, to: u64) -> Result<String, ProviderError> {
        let output = self.execute_diff_command(path, from, to)?;
        self.parse_diff_output(output, path, from, to)
    }
}

/// Canned in-memory diff backend
///
/// Serves diff text registered up front, keyed by path and revision pair,
/// and fails with [`ProviderError::Unavailable`] for anything else. This is
/// the substitutable backend used by tests, documentation examples, and
/// benchmarks.
#[derive(Debug, Clone, Default)]
pub struct StaticDiffProvider {
    diffs: HashMap<(String, u64, u64), String>,
}

impl StaticDiffProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the diff text served for one path and revision pair
    pub fn with_diff(mut self, path: &str, from: u64, to: u64, diff: &str) -> Self {
        self.diffs
            .insert((path.to_owned(), from, to), diff.to_owned());
        self
    }
}

impl DiffProvider for StaticDiffProvider {
    fn fetch_diff(&self, path: &str, from: u64, to: u64) -> Result<String, ProviderError> {
        self.diffs
            .get(&(path.to_owned(), from, to))
            .cloned()
            .ok_or_else(|| ProviderError::Unavailable {
                path: path.to_owned(),
                from,
                to,
            })
    }
}
