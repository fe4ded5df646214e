//! Generation error taxonomy.

use thiserror::Error;

use crate::model::config::{GenerationMode, TargetLanguage};
use crate::templates::TemplateError;

/// Errors raised while synthesizing server files. All of them are caught at
/// the `generate_server_code` boundary and normalized into a failed
/// [`GenerationResult`](crate::generation::GenerationResult); none escape
/// to the caller as a raw error.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The (language, mode) pair has no generator in the dispatch table.
    #[error("no generator available for {language} in {mode} mode")]
    UnsupportedLanguage {
        language: TargetLanguage,
        mode: GenerationMode,
    },

    /// Missing or mismatched template registration. Programmer error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The config failed its structural checks before generation started.
    #[error("invalid server config: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else that went wrong during file synthesis.
    #[error("generation failed: {0}")]
    Internal(String),
}

impl GenerationError {
    pub fn unsupported(language: TargetLanguage, mode: GenerationMode) -> Self {
        GenerationError::UnsupportedLanguage { language, mode }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        GenerationError::InvalidConfig(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GenerationError::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_language_and_mode() {
        let err = GenerationError::unsupported(TargetLanguage::Go, GenerationMode::Proxy);
        assert_eq!(err.to_string(), "no generator available for go in proxy mode");
    }

    #[test]
    fn test_template_error_converts() {
        let err: GenerationError = TemplateError::NotFound("x".to_string()).into();
        assert!(err.to_string().contains("template"));
    }
}
