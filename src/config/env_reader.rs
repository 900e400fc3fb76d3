//! Environment reader module
//!
//! This module provides the low-level environment-variable abstraction used
//! by the configuration layer, with a mockable trait so configuration
//! resolution can be tested without touching the process environment.

use std::env;

use thiserror::Error;

/// Environment-specific errors that can occur while reading variables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// The variable is set but its value is not valid Unicode
    #[error("environment variable '{key}' is not valid Unicode")]
    NotUnicode { key: String },
}

/// Trait for reading environment variables
pub trait EnvReader {
    /// Get an environment variable by key
    ///
    /// Unset and empty variables both read as `None`.
    fn get_var(&self, key: &str) -> Result<Option<String>, EnvError>;
}

/// Environment reader backed by the process environment
pub struct SystemEnvReader;

impl EnvReader for SystemEnvReader {
    fn get_var(&self, key: &str) -> Result<Option<String>, EnvError> {
        match env::var(key) {
            Ok(value) => Ok((!value.is_empty()).then_some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode {
                key: key.to_owned(),
            }),
        }
    }
}

/// Mock environment reader for testing
#[cfg(test)]
#[derive(Default)]
pub struct MockEnvReader {
    vars: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvReader {
    /// Create a new mock reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the mock reader
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

#[cfg(test)]
impl EnvReader for MockEnvReader {
    fn get_var(&self, key: &str) -> Result<Option<String>, EnvError> {
        Ok(self.vars.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **What is tested:** MockEnvReader storage and retrieval of variables
    /// **Why it is tested:** Configuration tests depend on the mock returning exactly the values registered
    /// **Test conditions:** Mock with two variables, queried for present and absent keys
    /// **Expectations:** Present keys return their values, absent keys return None
    #[test]
    fn test_mock_env_reader() {
        let reader = MockEnvReader::new()
            .with_var("TEST_KEY_ONE", "one")
            .with_var("TEST_KEY_TWO", "two");

        assert_eq!(reader.get_var("TEST_KEY_ONE"), Ok(Some("one".to_owned())));
        assert_eq!(reader.get_var("TEST_KEY_TWO"), Ok(Some("two".to_owned())));
        assert_eq!(reader.get_var("TEST_KEY_MISSING"), Ok(None));
    }

    /// **What is tested:** SystemEnvReader behavior for unset variables
    /// **Why it is tested:** Unset variables must read as None rather than an error so resolution can fall through to defaults
    /// **Test conditions:** Queries a variable name that is not set in the test environment
    /// **Expectations:** Ok(None) without error
    #[test]
    fn test_system_env_reader_unset_variable() {
        let reader = SystemEnvReader;
        assert_eq!(
            reader.get_var("SVN_LOG_STATS_TEST_SURELY_UNSET_VARIABLE"),
            Ok(None)
        );
    }

    /// **What is tested:** Display formatting of EnvError
    /// **Why it is tested:** The error surfaces at startup and must name the offending variable
    /// **Test conditions:** NotUnicode error for a known key
    /// **Expectations:** The message contains the variable name
    #[test]
    fn test_env_error_display() {
        let error = EnvError::NotUnicode {
            key: "SVN_LOG_STATS_URL".to_owned(),
        };
        assert!(format!("{error}").contains("SVN_LOG_STATS_URL"));
    }
}
