//! Definition loaders.
//!
//! Loaders only fetch raw bytes; sniffing and parsing happen downstream so
//! every source goes through the same detection pipeline.

use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::core::{Error, Result};
use crate::ingest::sniffer::RawContent;

/// Raw content plus the filename hint the sniffer can use.
#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    pub content: RawContent,
    pub filename: Option<String>,
}

/// Port for fetching definition content from some source string.
#[async_trait]
pub trait DefinitionLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<LoadedDefinition>;
}

/// Loads definitions from local files.
pub struct FileDefinitionLoader;

impl FileDefinitionLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileDefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DefinitionLoader for FileDefinitionLoader {
    async fn load(&self, source: &str) -> Result<LoadedDefinition> {
        let bytes = fs::read(source).await?;
        debug!(source, size = bytes.len(), "read definition file");

        // Valid UTF-8 becomes text; anything else stays bytes and the
        // sniffer decodes it lossily for inspection.
        let content = match String::from_utf8(bytes) {
            Ok(text) => RawContent::Text(text),
            Err(err) => RawContent::Bytes(err.into_bytes()),
        };

        let filename = Path::new(source)
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string());
        Ok(LoadedDefinition { content, filename })
    }
}

/// Loads definitions from HTTP(S) URLs.
pub struct HttpDefinitionLoader {
    client: Client,
}

impl HttpDefinitionLoader {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpDefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DefinitionLoader for HttpDefinitionLoader {
    async fn load(&self, source: &str) -> Result<LoadedDefinition> {
        if !source.starts_with("http://") && !source.starts_with("https://") {
            return Err(Error::load(format!(
                "HttpDefinitionLoader only handles HTTP(S) URLs, got: {source}"
            )));
        }

        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| Error::load(format!("Failed to fetch definition from {source}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::load(format!("HTTP {status} when fetching {source}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::load(format!("Failed to read response body: {e}")))?;
        debug!(source, size = text.len(), "fetched definition");

        let filename = url::Url::parse(source)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
            })
            .filter(|s| !s.is_empty());

        Ok(LoadedDefinition {
            content: RawContent::Text(text),
            filename,
        })
    }
}

/// Dispatches to the HTTP or file loader by source scheme, so callers hold a
/// single loader regardless of where definitions come from.
pub struct CompositeDefinitionLoader {
    http: HttpDefinitionLoader,
    file: FileDefinitionLoader,
}

impl CompositeDefinitionLoader {
    pub fn new() -> Self {
        Self {
            http: HttpDefinitionLoader::new(),
            file: FileDefinitionLoader::new(),
        }
    }
}

impl Default for CompositeDefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DefinitionLoader for CompositeDefinitionLoader {
    async fn load(&self, source: &str) -> Result<LoadedDefinition> {
        if source.starts_with("http://") || source.starts_with("https://") {
            debug!(source, "loading definition over HTTP");
            self.http.load(source).await
        } else {
            debug!(source, "loading definition from file");
            self.file.load(source).await
        }
    }
}
