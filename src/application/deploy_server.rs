//! Use case for running simulated deployments

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{ApplicationError, ValidationError};
use crate::deploy::{package, simulate_deploy};
use crate::generation::ServerFile;
use crate::model::config::ServerConfig;
use crate::store::{DeploymentRecord, DeploymentStatus, DeploymentStore};

/// Request to deploy a generated file set
#[derive(Debug, Clone)]
pub struct DeployServerRequest {
    pub configuration_id: String,
    pub config: ServerConfig,
    pub files: Vec<ServerFile>,
}

impl DeployServerRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.configuration_id.is_empty() {
            return Err(ValidationError::EmptyConfigurationId);
        }
        Ok(())
    }
}

/// Use case for deploying a generated server.
///
/// Deploy failures are written into the record's status and log instead of
/// being returned; only request validation and store failures propagate as
/// errors. Callers poll the record for the outcome.
pub struct DeployServerUseCase {
    deployments: Arc<dyn DeploymentStore>,
}

impl DeployServerUseCase {
    pub fn new(deployments: Arc<dyn DeploymentStore>) -> Self {
        Self { deployments }
    }

    pub async fn execute(
        &self,
        request: DeployServerRequest,
    ) -> Result<DeploymentRecord, ApplicationError> {
        // 1. Validate request
        request.validate()?;

        // 2. Create the record in its pending state
        let mut record = DeploymentRecord::new(request.configuration_id);
        self.deployments.create(&record).await?;

        // 3. Mark processing before the slow part starts
        record.transition(DeploymentStatus::Processing);
        record.log_line(format!(
            "packaging {} generated file(s)",
            request.files.len()
        ));
        self.deployments.update(&record).await?;

        // 4. Package and deploy; failures land in the record, not the caller
        let outcome = match package(&request.config, request.files) {
            Ok(bundle) => {
                record.log_line(format!("bundle ready with {} file(s)", bundle.len()));
                simulate_deploy(&request.config, &bundle).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(url) => {
                record.url = Some(url.to_string());
                record.log_line(format!("deployed to {url}"));
                record.transition(DeploymentStatus::Success);
                info!(id = %record.id, %url, "deployment succeeded");
            }
            Err(e) => {
                record.log_line(format!("deployment failed: {e}"));
                record.transition(DeploymentStatus::Failed);
                warn!(id = %record.id, error = %e, "deployment failed");
            }
        }

        // 5. Write the terminal state back
        self.deployments.update(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::TargetLanguage;
    use crate::store::Result as StoreResult;
    use std::sync::Mutex;

    /// Captures every create and update so tests can assert the sequence of
    /// states the store saw.
    #[derive(Default)]
    struct RecordingDeploymentStore {
        created: Mutex<Vec<DeploymentRecord>>,
        updated: Mutex<Vec<DeploymentRecord>>,
    }

    #[async_trait::async_trait]
    impl DeploymentStore for RecordingDeploymentStore {
        async fn create(&self, record: &DeploymentRecord) -> StoreResult<()> {
            self.created.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn get(&self, _id: &str) -> StoreResult<Option<DeploymentRecord>> {
            Ok(None)
        }

        async fn list_for_configuration(
            &self,
            _configuration_id: &str,
        ) -> StoreResult<Vec<DeploymentRecord>> {
            Ok(Vec::new())
        }

        async fn update(&self, record: &DeploymentRecord) -> StoreResult<bool> {
            self.updated.lock().unwrap().push(record.clone());
            Ok(true)
        }

        async fn delete(&self, _id: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    fn use_case() -> (DeployServerUseCase, Arc<RecordingDeploymentStore>) {
        let store = Arc::new(RecordingDeploymentStore::default());
        (DeployServerUseCase::new(store.clone()), store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_deploy_writes_url_and_log() {
        let (use_case, store) = use_case();

        let record = use_case
            .execute(DeployServerRequest {
                configuration_id: "cfg-1".to_string(),
                config: ServerConfig::new("Widget API", TargetLanguage::TypeScript),
                files: vec![ServerFile::config("", "package.json", "{}\n")],
            })
            .await
            .unwrap();

        assert_eq!(record.status, DeploymentStatus::Success);
        assert!(record.url.as_deref().unwrap_or("").contains("widget-api"));
        assert!(record.log.iter().any(|l| l.starts_with("deployed to ")));

        let created = store.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].status, DeploymentStatus::Pending);

        let updated = store.updated.lock().unwrap();
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].status, DeploymentStatus::Processing);
        assert_eq!(updated[1].status, DeploymentStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_deploy_is_written_back_not_thrown() {
        let (use_case, store) = use_case();

        // An empty file set cannot be packaged; the failure must land in the
        // record while execute still returns Ok.
        let record = use_case
            .execute(DeployServerRequest {
                configuration_id: "cfg-1".to_string(),
                config: ServerConfig::new("Widget API", TargetLanguage::TypeScript),
                files: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(record.status, DeploymentStatus::Failed);
        assert!(record.url.is_none());
        assert!(
            record
                .log
                .iter()
                .any(|l| l.contains("nothing to deploy")),
            "{:?}",
            record.log
        );

        let updated = store.updated.lock().unwrap();
        assert_eq!(updated.last().unwrap().status, DeploymentStatus::Failed);
    }

    #[tokio::test]
    async fn test_empty_configuration_id_rejected() {
        let (use_case, store) = use_case();

        let err = use_case
            .execute(DeployServerRequest {
                configuration_id: String::new(),
                config: ServerConfig::new("Widget API", TargetLanguage::TypeScript),
                files: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::ValidationError(ValidationError::EmptyConfigurationId)
        ));
        assert!(store.created.lock().unwrap().is_empty());
    }
}
