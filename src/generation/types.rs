//! Generation output types and the generator port.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::generation::errors::GenerationError;
use crate::model::config::{ServerConfig, TargetLanguage};

/// Classification tag on every generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Code,
    Config,
    Documentation,
}

/// One generated file. `path` is the directory relative to the output root
/// (empty for top-level files) and `name` the filename; callers write the
/// content to `<output>/<path>/<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerFile {
    pub name: String,
    pub path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<TargetLanguage>,
}

impl ServerFile {
    pub fn code(
        path: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        language: TargetLanguage,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
            file_type: FileType::Code,
            language: Some(language),
        }
    }

    pub fn config(
        path: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
            file_type: FileType::Config,
            language: None,
        }
    }

    pub fn documentation(
        path: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
            file_type: FileType::Documentation,
            language: None,
        }
    }

    /// Joined relative path, e.g. `src/routes/resourceRoutes.ts`.
    pub fn full_path(&self) -> PathBuf {
        if self.path.is_empty() {
            PathBuf::from(&self.name)
        } else {
            PathBuf::from(&self.path).join(&self.name)
        }
    }
}

/// The normalized outcome of a generation request. Failures are data, not
/// panics: `success` is false and `error` carries the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ServerFile>>,
}

impl GenerationResult {
    pub fn succeeded(files: Vec<ServerFile>) -> Self {
        Self {
            success: true,
            server_url: None,
            error: None,
            files: Some(files),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            server_url: None,
            error: Some(error.into()),
            files: None,
        }
    }
}

/// A language/mode-specific server generator. Pure: no network or file
/// I/O happens here; writing files is the caller's concern.
pub trait ServerGenerator: Send + Sync + std::fmt::Debug {
    /// Synthesizes the complete file list for a config.
    fn generate(&self, config: &ServerConfig) -> Result<Vec<ServerFile>, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_joins_directory_and_name() {
        let file = ServerFile::code(
            "src/routes",
            "resourceRoutes.ts",
            "",
            TargetLanguage::TypeScript,
        );
        assert_eq!(
            file.full_path(),
            PathBuf::from("src/routes/resourceRoutes.ts")
        );

        let top = ServerFile::config("", "package.json", "{}");
        assert_eq!(top.full_path(), PathBuf::from("package.json"));
    }

    #[test]
    fn test_server_file_wire_shape() {
        let file = ServerFile::documentation("", "README.md", "# x");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "documentation");
        assert!(json.get("language").is_none());
    }

    #[test]
    fn test_result_constructors() {
        let ok = GenerationResult::succeeded(vec![]);
        assert!(ok.success);
        assert_eq!(ok.files.as_deref(), Some(&[][..]));

        let failed = GenerationResult::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.files.is_none());
    }
}
