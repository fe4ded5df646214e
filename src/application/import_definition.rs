//! Use case for importing API definitions into a project

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{ApplicationError, ValidationError};
use crate::ingest::{
    Classification, DefinitionLoader, RawContent, classify, detect, extract, parse, validate,
};
use crate::model::endpoint::Endpoint;
use crate::store::{ApiDefinitionRecord, ApiDefinitionStore};

/// Request to import an API definition from a file path or URL
#[derive(Debug, Clone)]
pub struct ImportDefinitionRequest {
    pub project_id: String,
    /// Display name; falls back to the source filename.
    pub name: Option<String>,
    pub source: String,
}

impl ImportDefinitionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::EmptyProjectId);
        }
        if self.source.is_empty() {
            return Err(ValidationError::EmptySource);
        }
        Ok(())
    }
}

/// Response from a definition import.
///
/// Validation failures are data, not errors: `validation` carries every
/// message and `record` stays `None`, so the caller can show the full list
/// before anything is saved.
#[derive(Debug, Clone)]
pub struct ImportDefinitionResponse {
    pub record: Option<ApiDefinitionRecord>,
    pub classification: Classification,
    pub validation: Vec<String>,
    pub endpoints: Vec<Endpoint>,
}

impl ImportDefinitionResponse {
    pub fn is_valid(&self) -> bool {
        self.validation.is_empty()
    }
}

/// Use case for importing an API definition
pub struct ImportDefinitionUseCase {
    loader: Arc<dyn DefinitionLoader>,
    definitions: Arc<dyn ApiDefinitionStore>,
}

impl ImportDefinitionUseCase {
    pub fn new(
        loader: Arc<dyn DefinitionLoader>,
        definitions: Arc<dyn ApiDefinitionStore>,
    ) -> Self {
        Self {
            loader,
            definitions,
        }
    }

    pub async fn execute(
        &self,
        request: ImportDefinitionRequest,
    ) -> Result<ImportDefinitionResponse, ApplicationError> {
        // 1. Validate request
        request.validate()?;

        // 2. Load raw content
        let loaded = self.loader.load(&request.source).await?;

        // 3. Sniff and parse; parse failures abort the import
        let detected = detect(&loaded.content, loaded.filename.as_deref());
        let parsed = parse(&loaded.content, detected)?;

        // 4. Classify the dialect
        let classification = classify(&parsed);

        // 5. Validate; failures block saving and come back as data
        let messages = validate(&parsed, classification.format);
        if !messages.is_empty() {
            warn!(
                source = %request.source,
                count = messages.len(),
                "definition failed validation"
            );
            return Ok(ImportDefinitionResponse {
                record: None,
                classification,
                validation: messages,
                endpoints: Vec::new(),
            });
        }

        // 6. Extract endpoints; an empty list is degraded, not an error
        let endpoints = extract(&parsed, classification.format);
        if endpoints.is_empty() {
            warn!(source = %request.source, "no endpoints extracted, saving definition empty");
        }

        // 7. Persist the definition with its cached extraction
        let name = request
            .name
            .or_else(|| loaded.filename.clone())
            .unwrap_or_else(|| "untitled".to_string());
        let content = match &loaded.content {
            RawContent::Value(value) => {
                serde_json::to_string_pretty(value).map_err(crate::core::Error::Json)?
            }
            other => other.as_text().map(|t| t.into_owned()).unwrap_or_default(),
        };

        let mut record =
            ApiDefinitionRecord::new(request.project_id, name, classification.format, content);
        record.endpoints = Some(endpoints.clone());
        self.definitions.create(&record).await?;

        info!(
            id = %record.id,
            format = %classification.format,
            endpoints = endpoints.len(),
            "imported definition"
        );

        Ok(ImportDefinitionResponse {
            record: Some(record),
            classification,
            validation: Vec::new(),
            endpoints,
        })
    }
}
