//! API dialect classification over parsed documents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ingest::parser::ParsedDocument;

/// The API description dialects understood downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiFormat {
    #[serde(rename = "openapi2")]
    OpenApi2,
    #[serde(rename = "openapi3")]
    OpenApi3,
    #[serde(rename = "raml")]
    Raml,
    #[serde(rename = "apiblueprint")]
    ApiBlueprint,
}

impl ApiFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFormat::OpenApi2 => "openapi2",
            ApiFormat::OpenApi3 => "openapi3",
            ApiFormat::Raml => "raml",
            ApiFormat::ApiBlueprint => "apiblueprint",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ApiFormat::OpenApi2 => "OpenAPI 2.0",
            ApiFormat::OpenApi3 => "OpenAPI 3.x",
            ApiFormat::Raml => "RAML",
            ApiFormat::ApiBlueprint => "API Blueprint",
        }
    }
}

impl fmt::Display for ApiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApiFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openapi2" => Ok(ApiFormat::OpenApi2),
            "openapi3" => Ok(ApiFormat::OpenApi3),
            "raml" => Ok(ApiFormat::Raml),
            "apiblueprint" => Ok(ApiFormat::ApiBlueprint),
            other => Err(format!("unknown api format: {other}")),
        }
    }
}

/// Whether classification matched a real dialect marker or fell through to
/// the compatibility default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationBasis {
    /// A version marker or degenerate-document flag matched.
    Marker,
    /// Nothing matched; OpenAPI 3 assumed for compatibility.
    Fallback,
}

/// Classification result, carrying how the decision was reached so callers
/// can tell a marker match from the silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub format: ApiFormat,
    pub basis: ClassificationBasis,
}

impl Classification {
    fn marker(format: ApiFormat) -> Self {
        Self {
            format,
            basis: ClassificationBasis::Marker,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.basis == ClassificationBasis::Fallback
    }
}

/// Maps a parsed document to its API dialect.
///
/// Pure marker matching: `swagger: "2.0"`, an `openapi` version starting
/// with `3.`, or the degenerate RAML/Blueprint records. Anything else is
/// OpenAPI 3 by fallback, reported as such.
pub fn classify(parsed: &ParsedDocument) -> Classification {
    match parsed {
        ParsedDocument::Raml { .. } => Classification::marker(ApiFormat::Raml),
        ParsedDocument::ApiBlueprint { .. } => Classification::marker(ApiFormat::ApiBlueprint),
        ParsedDocument::Structured(value) => {
            if value.get("swagger").and_then(|v| v.as_str()) == Some("2.0") {
                return Classification::marker(ApiFormat::OpenApi2);
            }
            if let Some(version) = value.get("openapi").and_then(|v| v.as_str())
                && version.starts_with("3.")
            {
                return Classification::marker(ApiFormat::OpenApi3);
            }
            Classification {
                format: ApiFormat::OpenApi3,
                basis: ClassificationBasis::Fallback,
            }
        }
    }
}
