//! SQLite-backed implementation of the storage ports.
//!
//! One pooled database holds all three record families. Rich nested
//! values (endpoint lists, config snapshots, deploy logs) live in JSON
//! text columns; everything queried or filtered on gets its own column
//! and index.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ingest::classifier::ApiFormat;
use crate::model::endpoint::Endpoint;
use crate::store::records::{
    ApiDefinitionRecord, DeploymentRecord, DeploymentStatus, ServerConfigRecord,
};
use crate::store::traits::{ApiDefinitionStore, DeploymentStore, ServerConfigStore};
use crate::store::{Result, StoreError};

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Opens (or creates) a file-backed store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref());
        let pool = Pool::builder()
            .max_size(10)
            .connection_timeout(Duration::from_secs(30))
            // Recycle long-lived connections to avoid stale WAL readers.
            .max_lifetime(Some(Duration::from_secs(300)))
            .build(manager)
            .map_err(|e| StoreError::Pool(format!("failed to create connection pool: {e}")))?;
        Self::from_pool(pool).await
    }

    /// In-memory store for tests. Pinned to a single pooled connection:
    /// every extra connection would open its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StoreError::Pool(format!("failed to create connection pool: {e}")))?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: Pool<SqliteConnectionManager>) -> Result<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Runs a blocking database operation on a pooled connection.
    async fn with_connection<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| StoreError::Pool(format!("failed to get pooled connection: {e}")))?;
            f(&mut conn).map_err(StoreError::from)
        })
        .await?
    }

    async fn init_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            // WAL wants to live outside the transaction; in-memory
            // databases reject it, which is fine.
            conn.pragma_update(None, "journal_mode", "WAL").ok();
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "cache_size", 10000)?;

            let tx = conn.transaction()?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS api_definitions (
                    id TEXT PRIMARY KEY,
                    project_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    format TEXT NOT NULL,
                    content TEXT NOT NULL,
                    endpoints_json TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_api_definitions_project
                 ON api_definitions(project_id)",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS server_configs (
                    id TEXT PRIMARY KEY,
                    project_id TEXT NOT NULL,
                    config_json TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_server_configs_project
                 ON server_configs(project_id)",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS deployments (
                    id TEXT PRIMARY KEY,
                    configuration_id TEXT NOT NULL,
                    status TEXT NOT NULL,
                    url TEXT,
                    log_json TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_deployments_configuration
                 ON deployments(configuration_id)",
                [],
            )?;
            tx.commit()?;

            debug!("store schema ready");
            Ok(())
        })
        .await
    }
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn json_column<T: DeserializeOwned>(idx: usize, text: &str) -> rusqlite::Result<T> {
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn definition_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ApiDefinitionRecord> {
    let format_text: String = row.get(3)?;
    let format = format_text
        .parse::<ApiFormat>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;
    let endpoints = row
        .get::<_, Option<String>>(5)?
        .map(|text| json_column::<Vec<Endpoint>>(5, &text))
        .transpose()?;
    Ok(ApiDefinitionRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        format,
        content: row.get(4)?,
        endpoints,
        created_at: timestamp(row.get(6)?),
        updated_at: timestamp(row.get(7)?),
    })
}

fn config_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ServerConfigRecord> {
    let config_text: String = row.get(2)?;
    Ok(ServerConfigRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        config: json_column(2, &config_text)?,
        created_at: timestamp(row.get(3)?),
        updated_at: timestamp(row.get(4)?),
    })
}

fn deployment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeploymentRecord> {
    let status_text: String = row.get(2)?;
    let status = status_text
        .parse::<DeploymentStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;
    let log_text: String = row.get(4)?;
    Ok(DeploymentRecord {
        id: row.get(0)?,
        configuration_id: row.get(1)?,
        status,
        url: row.get(3)?,
        log: json_column(4, &log_text)?,
        created_at: timestamp(row.get(5)?),
        updated_at: timestamp(row.get(6)?),
    })
}

#[async_trait]
impl ApiDefinitionStore for SqliteStore {
    async fn create(&self, record: &ApiDefinitionRecord) -> Result<()> {
        let record = record.clone();
        let endpoints_json = record
            .endpoints
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO api_definitions
                 (id, project_id, name, format, content, endpoints_json, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.project_id,
                    record.name,
                    record.format.as_str(),
                    record.content,
                    endpoints_json,
                    record.created_at.timestamp_millis(),
                    record.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<ApiDefinitionRecord>> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, name, format, content, endpoints_json,
                        created_at, updated_at
                 FROM api_definitions WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], definition_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn list_for_project(&self, project_id: &str) -> Result<Vec<ApiDefinitionRecord>> {
        let project_id = project_id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, name, format, content, endpoints_json,
                        created_at, updated_at
                 FROM api_definitions WHERE project_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt.query_map(params![project_id], definition_from_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
    }

    async fn update(&self, record: &ApiDefinitionRecord) -> Result<bool> {
        let record = record.clone();
        let endpoints_json = record
            .endpoints
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.with_connection(move |conn| {
            let changes = conn.execute(
                "UPDATE api_definitions
                 SET project_id = ?2, name = ?3, format = ?4, content = ?5,
                     endpoints_json = ?6, updated_at = ?7
                 WHERE id = ?1",
                params![
                    record.id,
                    record.project_id,
                    record.name,
                    record.format.as_str(),
                    record.content,
                    endpoints_json,
                    Utc::now().timestamp_millis(),
                ],
            )?;
            Ok(changes > 0)
        })
        .await
    }

    async fn update_endpoints(&self, id: &str, endpoints: &[Endpoint]) -> Result<bool> {
        let id = id.to_string();
        let endpoints_json = serde_json::to_string(endpoints)?;
        self.with_connection(move |conn| {
            let changes = conn.execute(
                "UPDATE api_definitions SET endpoints_json = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, endpoints_json, Utc::now().timestamp_millis()],
            )?;
            Ok(changes > 0)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let changes = conn.execute("DELETE FROM api_definitions WHERE id = ?1", params![id])?;
            Ok(changes > 0)
        })
        .await
    }
}

#[async_trait]
impl ServerConfigStore for SqliteStore {
    async fn create(&self, record: &ServerConfigRecord) -> Result<()> {
        let record = record.clone();
        let config_json = serde_json::to_string(&record.config)?;
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO server_configs
                 (id, project_id, config_json, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.id,
                    record.project_id,
                    config_json,
                    record.created_at.timestamp_millis(),
                    record.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<ServerConfigRecord>> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, config_json, created_at, updated_at
                 FROM server_configs WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], config_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn list_for_project(&self, project_id: &str) -> Result<Vec<ServerConfigRecord>> {
        let project_id = project_id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, config_json, created_at, updated_at
                 FROM server_configs WHERE project_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt.query_map(params![project_id], config_from_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
    }

    async fn update(&self, record: &ServerConfigRecord) -> Result<bool> {
        let record = record.clone();
        let config_json = serde_json::to_string(&record.config)?;
        self.with_connection(move |conn| {
            let changes = conn.execute(
                "UPDATE server_configs
                 SET project_id = ?2, config_json = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![
                    record.id,
                    record.project_id,
                    config_json,
                    Utc::now().timestamp_millis(),
                ],
            )?;
            Ok(changes > 0)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let changes = conn.execute("DELETE FROM server_configs WHERE id = ?1", params![id])?;
            Ok(changes > 0)
        })
        .await
    }
}

#[async_trait]
impl DeploymentStore for SqliteStore {
    async fn create(&self, record: &DeploymentRecord) -> Result<()> {
        let record = record.clone();
        let log_json = serde_json::to_string(&record.log)?;
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO deployments
                 (id, configuration_id, status, url, log_json, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.configuration_id,
                    record.status.as_str(),
                    record.url,
                    log_json,
                    record.created_at.timestamp_millis(),
                    record.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<DeploymentRecord>> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, configuration_id, status, url, log_json, created_at, updated_at
                 FROM deployments WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], deployment_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn list_for_configuration(
        &self,
        configuration_id: &str,
    ) -> Result<Vec<DeploymentRecord>> {
        let configuration_id = configuration_id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, configuration_id, status, url, log_json, created_at, updated_at
                 FROM deployments WHERE configuration_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt.query_map(params![configuration_id], deployment_from_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
    }

    async fn update(&self, record: &DeploymentRecord) -> Result<bool> {
        let record = record.clone();
        let log_json = serde_json::to_string(&record.log)?;
        self.with_connection(move |conn| {
            let changes = conn.execute(
                "UPDATE deployments
                 SET configuration_id = ?2, status = ?3, url = ?4, log_json = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    record.id,
                    record.configuration_id,
                    record.status.as_str(),
                    record.url,
                    log_json,
                    Utc::now().timestamp_millis(),
                ],
            )?;
            Ok(changes > 0)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let changes = conn.execute("DELETE FROM deployments WHERE id = ?1", params![id])?;
            Ok(changes > 0)
        })
        .await
    }
}
