//! Decoding sniffed content into a [`ParsedDocument`].

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::core::{Error, Result};
use crate::ingest::sniffer::{DetectedFormat, RawContent};

/// Dialect-agnostic decoded form.
///
/// JSON and YAML decode to a full structure. RAML and API Blueprint, which
/// have no structural parser here, become degenerate records that keep the
/// original text so extraction can fall back to line scanning.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDocument {
    /// Fully decoded JSON/YAML document.
    Structured(JsonValue),
    /// RAML metadata plus the raw text. `structure` holds the YAML decode
    /// of the body when it succeeds, which is where a pre-parsed
    /// `resources` tree would live.
    Raml {
        version: Option<String>,
        title: Option<String>,
        structure: Option<JsonValue>,
        text: String,
    },
    /// API Blueprint kept verbatim. `ast` is only present when a caller
    /// supplies a pre-parsed blueprint tree.
    ApiBlueprint {
        ast: Option<JsonValue>,
        text: String,
    },
}

impl ParsedDocument {
    /// The decoded structure, when there is one.
    pub fn as_structured(&self) -> Option<&JsonValue> {
        match self {
            ParsedDocument::Structured(v) => Some(v),
            ParsedDocument::Raml { structure, .. } => structure.as_ref(),
            ParsedDocument::ApiBlueprint { ast, .. } => ast.as_ref(),
        }
    }
}

fn yaml_to_json(text: &str) -> std::result::Result<JsonValue, serde_yaml::Error> {
    serde_yaml::from_str::<JsonValue>(text)
}

/// Scans RAML text for the `#%RAML <version>` header and a `title:` line.
/// Best-effort metadata only, not a RAML grammar parser.
fn parse_raml(text: &str) -> ParsedDocument {
    let mut version = None;
    let mut title = None;
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("#%RAML") {
            let v = rest.trim();
            if !v.is_empty() {
                version = Some(v.to_string());
            }
        } else if let Some(rest) = trimmed.strip_prefix("title:")
            && title.is_none()
        {
            let t = rest.trim();
            if !t.is_empty() {
                title = Some(t.to_string());
            }
        }
    }

    // RAML bodies are YAML after the header line; a successful decode gives
    // structural extraction something to walk.
    let body: String = text
        .lines()
        .filter(|l| !l.trim_start().starts_with("#%RAML"))
        .collect::<Vec<_>>()
        .join("\n");
    let structure = yaml_to_json(&body).ok().filter(|v| v.is_object());

    ParsedDocument::Raml {
        version,
        title,
        structure,
        text: text.to_string(),
    }
}

/// Decodes content according to the sniffed format.
///
/// For `unknown`, JSON is attempted first and YAML second; when both fail
/// the YAML error is reported since YAML was the last, most permissive
/// attempt.
pub fn parse(content: &RawContent, detected: DetectedFormat) -> Result<ParsedDocument> {
    if let RawContent::Value(value) = content {
        return Ok(ParsedDocument::Structured(value.clone()));
    }
    let text = content
        .as_text()
        .ok_or_else(|| Error::parse("content has no textual form"))?;

    match detected {
        DetectedFormat::Json => {
            let value: JsonValue = serde_json::from_str(&text)?;
            Ok(ParsedDocument::Structured(value))
        }
        DetectedFormat::Yaml => {
            let value = yaml_to_json(&text)?;
            Ok(ParsedDocument::Structured(value))
        }
        DetectedFormat::Raml => Ok(parse_raml(&text)),
        DetectedFormat::ApiBlueprint => Ok(ParsedDocument::ApiBlueprint {
            ast: None,
            text: text.to_string(),
        }),
        DetectedFormat::Unknown => match serde_json::from_str::<JsonValue>(&text) {
            Ok(value) => Ok(ParsedDocument::Structured(value)),
            Err(json_err) => match yaml_to_json(&text) {
                Ok(value) => Ok(ParsedDocument::Structured(value)),
                Err(yaml_err) => {
                    debug!(%json_err, "json parse failed before yaml");
                    Err(Error::parse(format!(
                        "content is neither valid JSON nor YAML: {yaml_err}"
                    )))
                }
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json() {
        let content = RawContent::from(r#"{"openapi": "3.0.1", "info": {"title": "T"}}"#);
        let doc = parse(&content, DetectedFormat::Json).unwrap();
        assert_eq!(
            doc,
            ParsedDocument::Structured(json!({"openapi": "3.0.1", "info": {"title": "T"}}))
        );
    }

    #[test]
    fn test_parse_yaml_accepts_json_too() {
        // YAML is a superset of JSON; the YAML branch is the catch-all.
        let content = RawContent::from(r#"{"swagger": "2.0"}"#);
        let doc = parse(&content, DetectedFormat::Yaml).unwrap();
        assert_eq!(doc, ParsedDocument::Structured(json!({"swagger": "2.0"})));
    }

    #[test]
    fn test_parse_raml_extracts_metadata() {
        let text = "#%RAML 1.0\ntitle: Widget API\n/widgets:\n  get:\n";
        let doc = parse(&RawContent::from(text), DetectedFormat::Raml).unwrap();
        match doc {
            ParsedDocument::Raml {
                version,
                title,
                text: kept,
                ..
            } => {
                assert_eq!(version.as_deref(), Some("1.0"));
                assert_eq!(title.as_deref(), Some("Widget API"));
                assert_eq!(kept, text);
            }
            other => panic!("expected raml document, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_blueprint_keeps_text_verbatim() {
        let text = "FORMAT: 1A\n# Widget API\n\nGET /widgets\n";
        let doc = parse(&RawContent::from(text), DetectedFormat::ApiBlueprint).unwrap();
        assert_eq!(
            doc,
            ParsedDocument::ApiBlueprint {
                ast: None,
                text: text.to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_tries_json_then_yaml() {
        let yaml_only = RawContent::from("info:\n  title: Y\n");
        let doc = parse(&yaml_only, DetectedFormat::Unknown).unwrap();
        assert_eq!(doc, ParsedDocument::Structured(json!({"info": {"title": "Y"}})));
    }

    #[test]
    fn test_parse_unknown_reports_yaml_error_when_both_fail() {
        let err = parse(&RawContent::from("[unclosed"), DetectedFormat::Unknown).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("neither valid JSON nor YAML"), "{message}");
    }

    #[test]
    fn test_parse_decoded_value_passes_through() {
        let content = RawContent::Value(json!({"openapi": "3.0.0"}));
        let doc = parse(&content, DetectedFormat::Json).unwrap();
        assert_eq!(doc, ParsedDocument::Structured(json!({"openapi": "3.0.0"})));
    }
}
