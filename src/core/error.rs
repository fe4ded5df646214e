//! Error handling for the mcpforge library.
//!
//! This module defines the main error type `Error` used by the import
//! pipeline, along with a convenient `Result` type alias. It uses `thiserror`
//! for easy error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use mcpforge::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type for mcpforge import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mcpforge import operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Definition could not be parsed in any supported serialization
    #[error("parse error: {0}")]
    Parse(String),

    /// Definition could not be loaded from its source
    #[error("load error: {0}")]
    Load(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new load error
    pub fn load<S: Into<String>>(msg: S) -> Self {
        Self::Load(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("invalid configuration");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(
            error.to_string(),
            "configuration error: invalid configuration"
        );
    }

    #[test]
    fn test_error_parse_creation() {
        let error = Error::parse("unexpected token at line 3");
        assert!(matches!(error, Error::Parse(_)));
        assert_eq!(error.to_string(), "parse error: unexpected token at line 3");
    }

    #[test]
    fn test_error_load_creation() {
        let error = Error::load("definition not found");
        assert!(matches!(error, Error::Load(_)));
        assert_eq!(error.to_string(), "load error: definition not found");
    }

    #[test]
    fn test_error_from_str() {
        let error: Error = "test error message".into();
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "configuration error: test error message");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("I/O error"));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_serde_json_error() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("not json");
        let error: Error = json_result.unwrap_err().into();
        assert!(matches!(error, Error::Json(_)));
        assert!(error.to_string().contains("JSON parsing error"));
    }
}
