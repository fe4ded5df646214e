//! Storage ports.
//!
//! One trait per record family, all plain CRUD plus the parent-scoped
//! listing each record is queried by. Update operations report whether
//! a row was actually touched so callers can distinguish "saved" from
//! "no such record".

use async_trait::async_trait;

use crate::model::endpoint::Endpoint;
use crate::store::records::{ApiDefinitionRecord, DeploymentRecord, ServerConfigRecord};
use crate::store::Result;

#[async_trait]
pub trait ApiDefinitionStore: Send + Sync {
    async fn create(&self, record: &ApiDefinitionRecord) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<ApiDefinitionRecord>>;
    async fn list_for_project(&self, project_id: &str) -> Result<Vec<ApiDefinitionRecord>>;
    async fn update(&self, record: &ApiDefinitionRecord) -> Result<bool>;
    /// Replaces the cached extraction on an existing definition.
    async fn update_endpoints(&self, id: &str, endpoints: &[Endpoint]) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ServerConfigStore: Send + Sync {
    async fn create(&self, record: &ServerConfigRecord) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<ServerConfigRecord>>;
    async fn list_for_project(&self, project_id: &str) -> Result<Vec<ServerConfigRecord>>;
    async fn update(&self, record: &ServerConfigRecord) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait DeploymentStore: Send + Sync {
    async fn create(&self, record: &DeploymentRecord) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<DeploymentRecord>>;
    async fn list_for_configuration(
        &self,
        configuration_id: &str,
    ) -> Result<Vec<DeploymentRecord>>;
    /// Status and log write-back happens through here; pollers read the
    /// record back until the status is terminal.
    async fn update(&self, record: &DeploymentRecord) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
}
