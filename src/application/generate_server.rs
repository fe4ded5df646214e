//! Use case for generating MCP server source from a configuration

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::application::{ApplicationError, OutputService, ValidationError};
use crate::generation::{conformance, generate_server_code};
use crate::model::config::ServerConfig;
use crate::store::{ServerConfigRecord, ServerConfigStore};

/// Request to generate a server and write it to disk
#[derive(Debug, Clone)]
pub struct GenerateServerRequest {
    pub project_id: String,
    pub config: ServerConfig,
    pub output_dir: PathBuf,
}

impl GenerateServerRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::EmptyProjectId);
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidConfiguration(
                "output directory cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response from server generation
#[derive(Debug, Clone)]
pub struct GenerateServerResponse {
    /// Id of the persisted configuration snapshot.
    pub configuration_id: String,
    pub files_written: usize,
    pub output_path: PathBuf,
}

/// Use case for generating server implementations
pub struct GenerateServerUseCase {
    configs: Arc<dyn ServerConfigStore>,
    output: Arc<dyn OutputService>,
}

impl GenerateServerUseCase {
    pub fn new(configs: Arc<dyn ServerConfigStore>, output: Arc<dyn OutputService>) -> Self {
        Self { configs, output }
    }

    pub async fn execute(
        &self,
        request: GenerateServerRequest,
    ) -> Result<GenerateServerResponse, ApplicationError> {
        // 1. Validate request
        request.validate()?;

        // 2. Generate; failures arrive as data and surface here
        let result = generate_server_code(&request.config);
        if !result.success {
            return Err(ApplicationError::GenerationError(
                result
                    .error
                    .unwrap_or_else(|| "generation failed without a message".to_string()),
            ));
        }
        let files = result.files.unwrap_or_default();

        // 3. Gate on the required-file layout
        let missing = conformance::verify_layout(&request.config, &files);
        if !missing.is_empty() {
            return Err(ApplicationError::LayoutIncomplete(missing.join(", ")));
        }

        // 4. Write everything under the output directory
        self.output.ensure_directory(&request.output_dir).await?;
        self.output.write_files(&request.output_dir, &files).await?;

        // 5. Snapshot the configuration that produced this output
        let record = ServerConfigRecord::new(request.project_id, request.config);
        self.configs.create(&record).await?;

        info!(
            configuration_id = %record.id,
            files = files.len(),
            output = %request.output_dir.display(),
            "generated server"
        );

        Ok(GenerateServerResponse {
            configuration_id: record.id,
            files_written: files.len(),
            output_path: request.output_dir,
        })
    }
}
