//! Output port for writing generated files, plus its file system
//! implementation.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ApplicationError;
use crate::generation::ServerFile;

/// Port for writing generated output
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Write every file under `root`, creating directories as needed.
    async fn write_files(
        &self,
        root: &Path,
        files: &[ServerFile],
    ) -> Result<(), ApplicationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError>;
}

/// File system output service
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_files(
        &self,
        root: &Path,
        files: &[ServerFile],
    ) -> Result<(), ApplicationError> {
        for file in files {
            let target = root.join(file.full_path());

            // Create parent directories if needed
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    ApplicationError::OutputError(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }

            // Write the file
            let mut handle = fs::File::create(&target).await.map_err(|e| {
                ApplicationError::OutputError(format!(
                    "Failed to create file {}: {}",
                    target.display(),
                    e
                ))
            })?;

            handle.write_all(file.content.as_bytes()).await.map_err(|e| {
                ApplicationError::OutputError(format!(
                    "Failed to write file {}: {}",
                    target.display(),
                    e
                ))
            })?;

            handle.flush().await.map_err(|e| {
                ApplicationError::OutputError(format!(
                    "Failed to flush file {}: {}",
                    target.display(),
                    e
                ))
            })?;

            debug!(path = %target.display(), "wrote generated file");
        }

        Ok(())
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError> {
        fs::create_dir_all(path).await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })
    }
}
