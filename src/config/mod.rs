//! Configuration module for svn-log-stats
//!
//! This module provides a unified configuration system that combines CLI
//! arguments with environment variables using strict error handling and
//! clear priority logic.
//!
//! # Architecture
//!
//! The configuration system is built with a layered architecture:
//!
//! - [`env_reader`] - Low-level environment-variable abstraction with error handling
//! - [`app_config`] - High-level application configuration with CLI integration
//!
//! # Priority Logic
//!
//! Configuration values are resolved with the following priority:
//!
//! 1. CLI parameters (highest priority)
//! 2. Environment variables
//! 3. Hardcoded defaults (only when neither is set)
//!
//! The repository base URL has no default; a run without one fails at
//! startup before any input is read.
//!
//! # Usage
//!
//! The main entry point is [`AppConfig::from_cli()`] which resolves a fully
//! configured application instance:
//!
//! ```rust
//! use svn_log_stats::config::{AppConfig, CliArgs};
//!
//! let cli_args = CliArgs {
//!     svn_url: Some("http://svn.example.com/repo".to_owned()),
//!     ..CliArgs::default()
//! };
//!
//! let config = AppConfig::from_cli(cli_args)?;
//! assert_eq!(config.svn_url(), "http://svn.example.com/repo");
//! # Ok::<(), svn_log_stats::ConfigError>(())
//! ```
//!
//! # Testing
//!
//! `MockEnvReader` backs configuration tests so resolution scenarios run
//! without touching the process environment.

// Public modules
pub mod app_config;
pub mod env_reader;

// Re-export public types for convenient access
pub use app_config::{
    AppConfig, CliArgs, ConfigBuilder, ConfigError, ENV_IGNORED_AUTHORS, ENV_IGNORED_PATHS,
    ENV_PASSWORD, ENV_SVN_URL, ENV_USERNAME,
};
pub use env_reader::{EnvError, EnvReader, SystemEnvReader};

// Re-export mock types for testing
#[cfg(test)]
pub use env_reader::MockEnvReader;
