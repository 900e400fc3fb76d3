//! Application configuration module
//!
//! This module provides the main application configuration structure that
//! combines CLI arguments with environment variables using a clear priority
//! system.

use thiserror::Error;

use super::env_reader::{EnvError, EnvReader, SystemEnvReader};

/// Environment variable naming the repository base URL
pub const ENV_SVN_URL: &str = "SVN_LOG_STATS_URL";
/// Environment variable naming the repository username
pub const ENV_USERNAME: &str = "SVN_LOG_STATS_USERNAME";
/// Environment variable naming the repository password
pub const ENV_PASSWORD: &str = "SVN_LOG_STATS_PASSWORD";
/// Environment variable holding the comma-separated ignored-author list
pub const ENV_IGNORED_AUTHORS: &str = "SVN_LOG_STATS_IGNORED_AUTHORS";
/// Environment variable holding the comma-separated ignored-path list
pub const ENV_IGNORED_PATHS: &str = "SVN_LOG_STATS_IGNORED_PATHS";

/// CLI arguments structure
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    /// Repository base URL prepended to logged paths
    pub svn_url: Option<String>,
    /// Username for repository authentication
    pub username: Option<String>,
    /// Password for repository authentication
    pub password: Option<String>,
    /// Authors whose revisions are excluded from the report
    pub ignore_authors: Vec<String>,
    /// Path substrings whose file changes are excluded from analysis
    pub ignore_paths: Vec<String>,
}

/// Configuration errors raised before any input is processed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting was supplied neither on the CLI nor in the environment
    #[error("missing {setting}: pass {cli_flag} or set ${env_var}")]
    MissingValue {
        setting: String,
        cli_flag: String,
        env_var: String,
    },

    /// An environment variable held an unusable value
    #[error("invalid value for ${variable}: '{value}' (expected: {expected})")]
    InvalidEnvValue {
        variable: String,
        value: String,
        expected: String,
    },

    /// Environment reading failed
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Repository base URL
    svn_url: String,
    /// Optional repository username
    username: Option<String>,
    /// Optional repository password
    password: Option<String>,
    /// Authors whose revisions are excluded from the report
    ignored_authors: Vec<String>,
    /// Path substrings excluded from analysis
    ignored_path_patterns: Vec<String>,
}

/// Configuration builder
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    svn_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    ignored_authors: Option<Vec<String>>,
    ignored_path_patterns: Option<Vec<String>>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repository base URL
    #[must_use]
    pub fn with_svn_url(mut self, url: Option<String>) -> Self {
        self.svn_url = url;
        self
    }

    /// Set the repository username
    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    /// Set the repository password
    #[must_use]
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Set the ignored-author list
    #[must_use]
    pub fn with_ignored_authors(mut self, authors: Vec<String>) -> Self {
        self.ignored_authors = Some(authors);
        self
    }

    /// Set the ignored-path-pattern list
    #[must_use]
    pub fn with_ignored_path_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignored_path_patterns = Some(patterns);
        self
    }

    /// Build the final AppConfig
    ///
    /// The repository URL is the one setting without a default; everything
    /// else falls back to the hardcoded lists.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let svn_url = self.svn_url.ok_or_else(|| ConfigError::MissingValue {
            setting: "repository URL".to_owned(),
            cli_flag: "--svn-url".to_owned(),
            env_var: ENV_SVN_URL.to_owned(),
        })?;

        Ok(AppConfig {
            svn_url,
            username: self.username,
            password: self.password,
            ignored_authors: self
                .ignored_authors
                .unwrap_or_else(Self::default_ignored_authors),
            ignored_path_patterns: self
                .ignored_path_patterns
                .unwrap_or_else(Self::default_ignored_path_patterns),
        })
    }

    /// Get default ignored authors (continuous-integration accounts)
    fn default_ignored_authors() -> Vec<String> {
        vec!["build".to_owned(), "teamcity".to_owned()]
    }

    /// Get default ignored path patterns (vendored code and release tags)
    fn default_ignored_path_patterns() -> Vec<String> {
        vec!["/dev/third-party".to_owned(), "/tags".to_owned()]
    }
}

impl AppConfig {
    /// Create AppConfig from CLI arguments
    ///
    /// Priority order:
    /// 1. CLI parameters (highest priority)
    /// 2. Environment variables
    /// 3. Hardcoded defaults (only when neither is set)
    pub fn from_cli(cli_args: CliArgs) -> Result<Self, ConfigError> {
        Self::from_cli_with_reader(cli_args, &SystemEnvReader)
    }

    /// Create AppConfig from CLI arguments with an explicit environment reader
    pub fn from_cli_with_reader<E: EnvReader>(
        cli_args: CliArgs,
        reader: &E,
    ) -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::new()
            .with_svn_url(Self::resolve_value(cli_args.svn_url, ENV_SVN_URL, reader)?)
            .with_username(Self::resolve_value(cli_args.username, ENV_USERNAME, reader)?)
            .with_password(Self::resolve_value(cli_args.password, ENV_PASSWORD, reader)?);

        let builder =
            match Self::resolve_list(cli_args.ignore_authors, ENV_IGNORED_AUTHORS, reader)? {
                Some(authors) => builder.with_ignored_authors(authors),
                None => builder,
            };
        let builder = match Self::resolve_list(cli_args.ignore_paths, ENV_IGNORED_PATHS, reader)? {
            Some(patterns) => builder.with_ignored_path_patterns(patterns),
            None => builder,
        };

        builder.build()
    }

    /// Resolve one scalar setting: CLI value, then environment, then unset
    fn resolve_value<E: EnvReader>(
        cli_value: Option<String>,
        env_var: &str,
        reader: &E,
    ) -> Result<Option<String>, ConfigError> {
        match cli_value {
            Some(value) => Ok(Some(value)),
            None => Ok(reader.get_var(env_var)?),
        }
    }

    /// Resolve one list setting: a non-empty CLI list wins, then a parsed
    /// environment list; `None` leaves the builder's default in place
    fn resolve_list<E: EnvReader>(
        cli_values: Vec<String>,
        env_var: &str,
        reader: &E,
    ) -> Result<Option<Vec<String>>, ConfigError> {
        if !cli_values.is_empty() {
            return Ok(Some(cli_values));
        }
        match reader.get_var(env_var)? {
            Some(value) => Ok(Some(Self::parse_env_list(env_var, &value)?)),
            None => Ok(None),
        }
    }

    /// Parse a comma-separated environment list value
    ///
    /// Entries are trimmed and empty entries are dropped. A value that
    /// parses to nothing at all is rejected rather than silently clearing
    /// the defaults.
    fn parse_env_list(variable: &str, value: &str) -> Result<Vec<String>, ConfigError> {
        let entries: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if entries.is_empty() {
            return Err(ConfigError::InvalidEnvValue {
                variable: variable.to_owned(),
                value: value.to_owned(),
                expected: "comma-separated list of non-empty entries".to_owned(),
            });
        }
        Ok(entries)
    }

    /// Get the repository base URL
    pub fn svn_url(&self) -> &str {
        &self.svn_url
    }

    /// Get the repository username, if any
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Get the repository password, if any
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Get the ignored-author list
    pub fn ignored_authors(&self) -> &[String] {
        &self.ignored_authors
    }

    /// Get the ignored-path-pattern list
    pub fn ignored_path_patterns(&self) -> &[String] {
        &self.ignored_path_patterns
    }
}
