//! Persisted record shapes.
//!
//! These are the only shapes that cross the storage boundary. The
//! transformation pipeline never sees them; the application layer maps
//! between records and the in-memory model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::classifier::ApiFormat;
use crate::model::config::ServerConfig;
use crate::model::endpoint::Endpoint;

/// An imported API definition, with the extracted endpoint list cached
/// alongside the raw content once extraction has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDefinitionRecord {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub format: ApiFormat,
    /// Raw definition text exactly as imported.
    pub content: String,
    /// Cached extraction result; `None` until extraction has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<Endpoint>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiDefinitionRecord {
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        format: ApiFormat,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            name: name.into(),
            format,
            content: content.into(),
            endpoints: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A snapshot of the server config a generation ran with, kept per
/// project so a deployment can be traced back to its exact inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfigRecord {
    pub id: String,
    pub project_id: String,
    pub config: ServerConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServerConfigRecord {
    pub fn new(project_id: impl Into<String>, config: ServerConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            config,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lifecycle states a deployment record moves through. Pollers read
/// this field until it reaches `Success` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    #[default]
    Pending,
    Processing,
    Success,
    Failed,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Processing => "processing",
            DeploymentStatus::Success => "success",
            DeploymentStatus::Failed => "failed",
        }
    }

    /// Whether the deployment has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentStatus::Success | DeploymentStatus::Failed)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeploymentStatus::Pending),
            "processing" => Ok(DeploymentStatus::Processing),
            "success" => Ok(DeploymentStatus::Success),
            "failed" => Ok(DeploymentStatus::Failed),
            other => Err(format!("unknown deployment status: {other}")),
        }
    }
}

/// One deploy attempt for a server config. Failures land in `status`
/// and `log`, never as errors thrown at the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: String,
    pub configuration_id: String,
    pub status: DeploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub log: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeploymentRecord {
    pub fn new(configuration_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            configuration_id: configuration_id.into(),
            status: DeploymentStatus::Pending,
            url: None,
            log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition(&mut self, status: DeploymentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn log_line(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_definition_record_has_no_cached_endpoints() {
        let record = ApiDefinitionRecord::new("proj-1", "Pet Store", ApiFormat::OpenApi3, "{}");
        assert!(!record.id.is_empty());
        assert_eq!(record.project_id, "proj-1");
        assert!(record.endpoints.is_none());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_deployment_lifecycle() {
        let mut record = DeploymentRecord::new("cfg-1");
        assert_eq!(record.status, DeploymentStatus::Pending);
        assert!(!record.status.is_terminal());

        record.transition(DeploymentStatus::Processing);
        record.log_line("packaging files");
        record.transition(DeploymentStatus::Success);

        assert!(record.status.is_terminal());
        assert_eq!(record.log, vec!["packaging files".to_string()]);
        assert!(record.updated_at >= record.created_at);
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            DeploymentStatus::Pending,
            DeploymentStatus::Processing,
            DeploymentStatus::Success,
            DeploymentStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<DeploymentStatus>(), Ok(status));
        }
        assert!("done".parse::<DeploymentStatus>().is_err());
    }
}
