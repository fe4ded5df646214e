//! Structural validation of parsed definitions.
//!
//! Validation collects every problem instead of stopping at the first, so
//! the caller can show the full list at once. An empty list means valid.
//! The checks are advisory for extraction but gate persistence.

use serde_json::Value as JsonValue;

use crate::ingest::classifier::ApiFormat;
use crate::ingest::parser::ParsedDocument;

fn has_nonempty_str(value: &JsonValue, pointer: &str) -> bool {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.trim().is_empty())
}

fn check_openapi(value: &JsonValue, format: ApiFormat, problems: &mut Vec<String>) {
    match format {
        ApiFormat::OpenApi2 => {
            if value.get("swagger").and_then(|v| v.as_str()) != Some("2.0") {
                problems.push("swagger field must be \"2.0\"".to_string());
            }
        }
        ApiFormat::OpenApi3 => {
            let ok = value
                .get("openapi")
                .and_then(|v| v.as_str())
                .is_some_and(|v| v.starts_with("3."));
            if !ok {
                problems.push("openapi field must be a 3.x version".to_string());
            }
        }
        _ => {}
    }

    if !has_nonempty_str(value, "/info/title") {
        problems.push("info.title is missing".to_string());
    }
    if !has_nonempty_str(value, "/info/version") {
        problems.push("info.version is missing".to_string());
    }

    let paths_nonempty = value
        .get("paths")
        .and_then(|v| v.as_object())
        .is_some_and(|m| !m.is_empty());
    if !paths_nonempty {
        problems.push("paths must contain at least one path".to_string());
    }
}

/// Runs the per-format structural checks, returning every failure message.
pub fn validate(parsed: &ParsedDocument, format: ApiFormat) -> Vec<String> {
    let mut problems = Vec::new();

    match (parsed, format) {
        (ParsedDocument::Structured(value), ApiFormat::OpenApi2 | ApiFormat::OpenApi3) => {
            check_openapi(value, format, &mut problems);
        }
        (ParsedDocument::Raml { version, title, .. }, ApiFormat::Raml) => {
            if version.as_deref().is_none_or(|v| v.trim().is_empty()) {
                problems.push("RAML version header is missing".to_string());
            }
            if title.as_deref().is_none_or(|t| t.trim().is_empty()) {
                problems.push("title is missing".to_string());
            }
        }
        (ParsedDocument::ApiBlueprint { text, .. }, ApiFormat::ApiBlueprint) => {
            if text.trim().is_empty() {
                problems.push("document content is empty".to_string());
            } else if !text.contains("# ") && !text.contains("FORMAT:") {
                problems.push(
                    "document has no API Blueprint heading or FORMAT: marker".to_string(),
                );
            }
        }
        // Format and document shape disagree; report rather than guess.
        (_, format) => {
            problems.push(format!(
                "document shape does not match the {format} format"
            ));
        }
    }

    problems
}
