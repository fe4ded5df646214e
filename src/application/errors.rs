//! Application layer error types

use thiserror::Error;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Import error: {0}")]
    ImportError(#[from] crate::core::Error),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Generated layout is missing required files: {0}")]
    LayoutIncomplete(String),

    #[error("Store error: {0}")]
    StoreError(#[from] crate::store::StoreError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Validation errors for requests
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Project id cannot be empty")]
    EmptyProjectId,

    #[error("Definition source cannot be empty")]
    EmptySource,

    #[error("Configuration id cannot be empty")]
    EmptyConfigurationId,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
