//! Input format sniffing.
//!
//! Detection is a pure function of the raw bytes plus an optional filename
//! hint. It decides only the *syntax* family; the classifier decides which
//! API dialect the decoded document speaks.

use serde_json::Value as JsonValue;
use std::fmt;
use std::path::Path;

/// Raw imported content before any decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawContent {
    /// Text as read from a file, URL, or paste buffer.
    Text(String),
    /// Undecoded bytes; inspected after lossy UTF-8 decoding.
    Bytes(Vec<u8>),
    /// An already-decoded structure handed over by a caller that parsed
    /// upstream of us.
    Value(JsonValue),
}

impl RawContent {
    /// Text view used for sniffing and line-oriented fallbacks.
    pub fn as_text(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            RawContent::Text(s) => Some(std::borrow::Cow::Borrowed(s)),
            RawContent::Bytes(b) => Some(String::from_utf8_lossy(b)),
            RawContent::Value(_) => None,
        }
    }
}

impl From<String> for RawContent {
    fn from(s: String) -> Self {
        RawContent::Text(s)
    }
}

impl From<&str> for RawContent {
    fn from(s: &str) -> Self {
        RawContent::Text(s.to_string())
    }
}

impl From<JsonValue> for RawContent {
    fn from(v: JsonValue) -> Self {
        RawContent::Value(v)
    }
}

/// What the sniffer decided the input syntax is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedFormat {
    Json,
    Yaml,
    Raml,
    #[serde(rename = "apiblueprint")]
    ApiBlueprint,
    Unknown,
}

impl DetectedFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedFormat::Json => "json",
            DetectedFormat::Yaml => "yaml",
            DetectedFormat::Raml => "raml",
            DetectedFormat::ApiBlueprint => "apiblueprint",
            DetectedFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects the syntax of raw definition content.
///
/// Rules apply in priority order: already-decoded values are `json`; a
/// `#%RAML` header wins over everything textual; a Markdown heading or
/// `FORMAT:` marker means API Blueprint; then the filename extension is
/// consulted; then a strict JSON parse; then YAML as the catch-all parse.
pub fn detect(content: &RawContent, filename: Option<&str>) -> DetectedFormat {
    let text = match content {
        RawContent::Value(_) => return DetectedFormat::Json,
        other => match other.as_text() {
            Some(text) => text,
            None => return DetectedFormat::Unknown,
        },
    };
    let trimmed = text.trim_start();

    if trimmed.starts_with("#%RAML") {
        return DetectedFormat::Raml;
    }
    if trimmed.starts_with("# ") || trimmed.starts_with("FORMAT:") {
        return DetectedFormat::ApiBlueprint;
    }

    if let Some(filename) = filename
        && let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str())
    {
        match ext.to_ascii_lowercase().as_str() {
            "raml" => return DetectedFormat::Raml,
            "md" | "apib" => return DetectedFormat::ApiBlueprint,
            _ => {}
        }
    }

    if serde_json::from_str::<JsonValue>(&text).is_ok() {
        return DetectedFormat::Json;
    }
    if serde_yaml::from_str::<serde_yaml::Value>(&text).is_ok() {
        return DetectedFormat::Yaml;
    }

    DetectedFormat::Unknown
}
