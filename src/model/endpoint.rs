//! The normalized endpoint model.
//!
//! Every supported definition dialect (OpenAPI 2/3, RAML, API Blueprint, or
//! an ad hoc `endpoints` document) is reduced to a flat list of [`Endpoint`]
//! records. This is the unit the editor mutates, the stores cache, and the
//! generators consume.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::core::utils::endpoint_id;

/// The seven HTTP methods recognized on a path item. Any other key on an
/// OpenAPI path item (`parameters`, `summary`, `servers`, `$ref`, ...) is
/// skipped during extraction rather than misread as a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// All methods, in the order extraction probes them
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Options,
            HttpMethod::Head,
        ]
    }

    /// Case-insensitive lookup used against path-item keys
    pub fn from_key(key: &str) -> Option<HttpMethod> {
        match key.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "OPTIONS" => Some(HttpMethod::Options),
            "HEAD" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    /// Normalized (uppercase) wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Lowercase form, as the methods appear as OpenAPI path-item keys
    pub fn lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::from_key(s).ok_or_else(|| format!("unknown HTTP method: {s}"))
    }
}

/// Protocol role an endpoint is mapped to.
///
/// `Resource` endpoints expose data, `Tool` endpoints perform actions, and
/// `None` excludes the endpoint from generation while keeping it listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpRole {
    Resource,
    Tool,
    None,
}

impl McpRole {
    /// The verb-based default: safe/read methods map to `Resource`, mutating
    /// methods to `Tool`. This single table backs the extractor default, the
    /// post-pass, and the editor's auto-classify.
    pub fn default_for(method: HttpMethod) -> McpRole {
        match method {
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Options => McpRole::Resource,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete | HttpMethod::Patch => {
                McpRole::Tool
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            McpRole::Resource => "resource",
            McpRole::Tool => "tool",
            McpRole::None => "none",
        }
    }
}

impl fmt::Display for McpRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for McpRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "resource" => Ok(McpRole::Resource),
            "tool" => Ok(McpRole::Tool),
            "none" => Ok(McpRole::None),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Parameter value types carried through from the source schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

// Unknown schema types (`file`, `date`, ...) degrade to `string` instead of
// failing the whole document.
impl<'de> Deserialize<'de> for ParamType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ParamType::from_schema(&raw))
    }
}

impl ParamType {
    /// Maps a schema `type` string; anything unrecognized falls back to
    /// `String`, matching the extraction default.
    pub fn from_schema(s: &str) -> ParamType {
        match s {
            "number" => ParamType::Number,
            "integer" => ParamType::Integer,
            "boolean" => ParamType::Boolean,
            "array" => ParamType::Array,
            "object" => ParamType::Object,
            _ => ParamType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }
}

/// A single request parameter (path, query, or body-level field as the
/// source dialect reported it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

// Sources write status codes as both `200` and `"default"`.
fn de_status_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid status code: {other}"))),
    }
}

/// A response as declared in the source definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    /// Status code kept as text since sources use both `200` and `default`.
    #[serde(deserialize_with = "de_status_code")]
    pub status_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonValue>,
}

impl ResponseSpec {
    /// The synthesized success response used when a dialect carries no
    /// response information.
    pub fn ok() -> Self {
        Self {
            status_code: "200".to_string(),
            description: "Successful response".to_string(),
            schema: None,
        }
    }
}

fn default_selected() -> bool {
    true
}

/// One normalized endpoint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Stable id derived from method+path, or a random id when the source
    /// carried none.
    pub id: String,
    /// URL template; may contain `{param}` placeholders.
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: Vec<ResponseSpec>,
    #[serde(rename = "mcpType")]
    pub mcp_type: McpRole,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

impl Endpoint {
    /// Builds an endpoint with the derived id and verb-default role.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: endpoint_id(method.as_str(), &path),
            path,
            method,
            description: String::new(),
            parameters: Vec::new(),
            responses: Vec::new(),
            mcp_type: McpRole::default_for(method),
            selected: true,
        }
    }

    /// Grouping key for bulk selection: the first `/`-delimited segment of
    /// the path, or `general` when the path has none.
    pub fn category(&self) -> &str {
        self.path
            .split('/')
            .find(|seg| !seg.is_empty())
            .unwrap_or("general")
    }

    /// Names of the `{param}` tokens in the path, in order.
    pub fn path_params(&self) -> Vec<&str> {
        let mut params = Vec::new();
        let mut rest = self.path.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            params.push(&rest[open + 1..open + close]);
            rest = &rest[open + close + 1..];
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_key_is_case_insensitive() {
        assert_eq!(HttpMethod::from_key("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::from_key("$ref"), None);
    }

    #[test]
    fn test_default_role_table() {
        assert_eq!(McpRole::default_for(HttpMethod::Get), McpRole::Resource);
        assert_eq!(McpRole::default_for(HttpMethod::Head), McpRole::Resource);
        assert_eq!(McpRole::default_for(HttpMethod::Options), McpRole::Resource);
        assert_eq!(McpRole::default_for(HttpMethod::Post), McpRole::Tool);
        assert_eq!(McpRole::default_for(HttpMethod::Put), McpRole::Tool);
        assert_eq!(McpRole::default_for(HttpMethod::Delete), McpRole::Tool);
        assert_eq!(McpRole::default_for(HttpMethod::Patch), McpRole::Tool);
    }

    #[test]
    fn test_category_grouping() {
        let a = Endpoint::new(HttpMethod::Get, "/users/list");
        let b = Endpoint::new(HttpMethod::Get, "/users/{id}");
        let root = Endpoint::new(HttpMethod::Get, "/");
        assert_eq!(a.category(), "users");
        assert_eq!(b.category(), "users");
        assert_eq!(root.category(), "general");
    }

    #[test]
    fn test_path_params() {
        let e = Endpoint::new(HttpMethod::Get, "/users/{userId}/posts/{postId}");
        assert_eq!(e.path_params(), vec!["userId", "postId"]);
        let none = Endpoint::new(HttpMethod::Get, "/users");
        assert!(none.path_params().is_empty());
    }

    #[test]
    fn test_endpoint_serde_wire_names() {
        let e = Endpoint::new(HttpMethod::Get, "/widgets");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["mcpType"], "resource");
        assert_eq!(json["selected"], true);

        // `selected` defaults to true when absent on the wire.
        let parsed: Endpoint = serde_json::from_value(serde_json::json!({
            "id": "GET--widgets",
            "path": "/widgets",
            "method": "GET",
            "mcpType": "resource"
        }))
        .unwrap();
        assert!(parsed.selected);
    }

    #[test]
    fn test_param_type_fallback() {
        assert_eq!(ParamType::from_schema("integer"), ParamType::Integer);
        assert_eq!(ParamType::from_schema("file"), ParamType::String);
        assert_eq!(ParamType::from_schema(""), ParamType::String);
    }

    #[test]
    fn test_response_status_code_accepts_numbers_and_strings() {
        let numeric: ResponseSpec =
            serde_json::from_value(serde_json::json!({"statusCode": 200})).unwrap();
        assert_eq!(numeric.status_code, "200");
        let named: ResponseSpec =
            serde_json::from_value(serde_json::json!({"statusCode": "default"})).unwrap();
        assert_eq!(named.status_code, "default");
    }

    #[test]
    fn test_unknown_param_type_degrades_to_string() {
        let param: Parameter = serde_json::from_value(serde_json::json!({
            "name": "upload",
            "type": "file"
        }))
        .unwrap();
        assert_eq!(param.param_type, ParamType::String);
    }
}
