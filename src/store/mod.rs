//! Record persistence behind storage ports.
//!
//! The pipeline itself never touches this module; only the application
//! layer reads and writes records.

pub mod records;
pub mod sqlite;
pub mod traits;

use thiserror::Error;

pub use records::{ApiDefinitionRecord, DeploymentRecord, DeploymentStatus, ServerConfigRecord};
pub use sqlite::SqliteStore;
pub use traits::{ApiDefinitionStore, DeploymentStore, ServerConfigStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
