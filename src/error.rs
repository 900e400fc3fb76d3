//! Error handling module
//!
//! This module provides the unified error type for the svn-log-stats
//! application. Component-specific errors (configuration, diff retrieval)
//! live next to their components and convert into [`Error`] at the
//! boundaries where they escalate.

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// IO-related errors while reading the log stream or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors raised before any input is processed
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
