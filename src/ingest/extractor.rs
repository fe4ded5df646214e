//! Endpoint extraction from parsed definitions.
//!
//! Extraction never fails: unusable shapes produce an empty list and a log
//! line, and the caller decides whether an empty result is a problem. Each
//! dialect gets a structural walk plus, for RAML and API Blueprint, a
//! line-oriented fallback over the original text.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ingest::classifier::ApiFormat;
use crate::ingest::parser::ParsedDocument;
use crate::model::endpoint::{
    Endpoint, HttpMethod, McpRole, ParamType, Parameter, ResponseSpec,
};

/// Extracts the endpoint list for a document of the given format.
pub fn extract(parsed: &ParsedDocument, format: ApiFormat) -> Vec<Endpoint> {
    let mut endpoints = match (parsed, format) {
        (ParsedDocument::Structured(value), ApiFormat::OpenApi2 | ApiFormat::OpenApi3) => {
            extract_openapi(value, format)
        }
        (ParsedDocument::Raml { structure, text, .. }, ApiFormat::Raml) => {
            extract_raml(structure.as_ref(), text)
        }
        (ParsedDocument::ApiBlueprint { ast, text }, ApiFormat::ApiBlueprint) => {
            extract_blueprint(ast.as_ref(), text)
        }
        (_, format) => {
            warn!(%format, "document shape does not match format; no endpoints extracted");
            Vec::new()
        }
    };

    // A plain `endpoints` array is the universal escape hatch when the
    // dialect walk found nothing.
    if endpoints.is_empty()
        && let Some(value) = parsed.as_structured()
    {
        endpoints = extract_endpoints_array(value);
    }

    post_pass(&mut endpoints);

    if endpoints.is_empty() {
        warn!(%format, "extraction found zero endpoints");
    } else {
        debug!(count = endpoints.len(), %format, "extracted endpoints");
    }
    endpoints
}

/// Assigns a random id to any endpoint that reached us without one. Roles
/// are already defaulted at construction time.
fn post_pass(endpoints: &mut [Endpoint]) {
    for endpoint in endpoints {
        if endpoint.id.trim().is_empty() {
            endpoint.id = Uuid::new_v4().to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAPI 2 / 3

fn extract_openapi(value: &JsonValue, format: ApiFormat) -> Vec<Endpoint> {
    let Some(paths) = value.get("paths").and_then(JsonValue::as_object) else {
        warn!("openapi document has no paths object");
        return Vec::new();
    };

    paths
        .iter()
        .flat_map(|(path, path_item)| {
            HttpMethod::all()
                .iter()
                .filter_map(|method| {
                    // Non-verb keys (`parameters`, `summary`, `$ref`, ...)
                    // fall out here because only the seven verbs are probed.
                    path_item
                        .get(method.lower())
                        .and_then(JsonValue::as_object)
                        .map(|operation| (path.as_str(), *method, path_item, operation))
                })
                .collect::<Vec<_>>()
        })
        .map(|(path, method, path_item, operation)| {
            build_openapi_endpoint(path, method, path_item, operation, format)
        })
        .collect()
}

fn build_openapi_endpoint(
    path: &str,
    method: HttpMethod,
    path_item: &JsonValue,
    operation: &serde_json::Map<String, JsonValue>,
    format: ApiFormat,
) -> Endpoint {
    let mut endpoint = Endpoint::new(method, path);

    endpoint.description = operation
        .get("summary")
        .or_else(|| operation.get("description"))
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();

    // Path-level parameters first, then operation-level. Same-named entries
    // coexist as duplicates; nothing here deduplicates.
    let mut parameters = map_parameters(path_item, format);
    parameters.extend(map_parameters(&JsonValue::Object(operation.clone()), format));
    endpoint.parameters = parameters;

    endpoint.responses = map_responses(operation, format);
    endpoint
}

fn map_parameters(container: &JsonValue, format: ApiFormat) -> Vec<Parameter> {
    let Some(params) = container.get("parameters").and_then(JsonValue::as_array) else {
        return Vec::new();
    };

    params
        .iter()
        .filter_map(|param| {
            let name = param.get("name").and_then(JsonValue::as_str)?.to_string();
            let type_str = match format {
                // v2 carries `type` inline; fall through to `schema.type`
                // for body parameters.
                ApiFormat::OpenApi2 => param
                    .get("type")
                    .or_else(|| param.pointer("/schema/type"))
                    .and_then(JsonValue::as_str),
                _ => param.pointer("/schema/type").and_then(JsonValue::as_str),
            };
            Some(Parameter {
                name,
                param_type: type_str.map(ParamType::from_schema).unwrap_or_default(),
                required: param
                    .get("required")
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
                description: param
                    .get("description")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

fn map_responses(
    operation: &serde_json::Map<String, JsonValue>,
    format: ApiFormat,
) -> Vec<ResponseSpec> {
    let Some(responses) = operation.get("responses").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    responses
        .iter()
        .map(|(status_code, response)| ResponseSpec {
            status_code: status_code.clone(),
            description: response
                .get("description")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string(),
            schema: match format {
                ApiFormat::OpenApi2 => response.get("schema").cloned(),
                _ => response.get("content").cloned(),
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// RAML

fn extract_raml(structure: Option<&JsonValue>, text: &str) -> Vec<Endpoint> {
    if let Some(resources) = structure
        .and_then(|s| s.get("resources"))
        .and_then(JsonValue::as_array)
    {
        let mut endpoints = Vec::new();
        walk_raml_resources(resources, "", &mut endpoints);
        if !endpoints.is_empty() {
            return endpoints;
        }
    }
    scan_raml_lines(text)
}

fn walk_raml_resources(resources: &[JsonValue], prefix: &str, out: &mut Vec<Endpoint>) {
    for resource in resources {
        let relative = resource
            .get("relativeUri")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        let uri = format!("{prefix}{relative}");

        if let Some(methods) = resource.get("methods").and_then(JsonValue::as_array) {
            for item in methods {
                let Some(method) = item
                    .get("method")
                    .and_then(JsonValue::as_str)
                    .and_then(HttpMethod::from_key)
                else {
                    continue;
                };
                let mut endpoint = Endpoint::new(method, uri.clone());
                endpoint.description = item
                    .get("description")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default()
                    .to_string();
                endpoint.responses = vec![ResponseSpec::ok()];
                out.push(endpoint);
            }
        }

        if let Some(nested) = resource.get("resources").and_then(JsonValue::as_array) {
            walk_raml_resources(nested, &uri, out);
        }
    }
}

/// Flat scan for `^/path:` lines followed by indented `method:` lines.
fn scan_raml_lines(text: &str) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();
    let mut current_path: Option<String> = None;

    for line in text.lines() {
        let indented = line.starts_with(' ') || line.starts_with('\t');
        let trimmed = line.trim();
        let Some(key) = trimmed.strip_suffix(':') else {
            continue;
        };

        if !indented && key.starts_with('/') {
            current_path = Some(key.to_string());
        } else if indented
            && let Some(path) = &current_path
            && let Some(method) = HttpMethod::from_key(key)
        {
            let mut endpoint = Endpoint::new(method, path.clone());
            endpoint.responses = vec![ResponseSpec::ok()];
            endpoints.push(endpoint);
        }
    }
    endpoints
}

// ---------------------------------------------------------------------------
// API Blueprint

fn extract_blueprint(ast: Option<&JsonValue>, text: &str) -> Vec<Endpoint> {
    if let Some(groups) = ast
        .and_then(|a| a.get("resourceGroups"))
        .and_then(JsonValue::as_array)
    {
        let endpoints = walk_blueprint_groups(groups);
        if !endpoints.is_empty() {
            return endpoints;
        }
    }
    scan_blueprint_lines(text)
}

fn walk_blueprint_groups(groups: &[JsonValue]) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();
    for group in groups {
        let resources = group
            .get("resources")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for resource in resources {
            let Some(uri) = resource.get("uriTemplate").and_then(JsonValue::as_str) else {
                continue;
            };
            let actions = resource
                .get("actions")
                .and_then(JsonValue::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for action in actions {
                let Some(method) = action
                    .get("method")
                    .and_then(JsonValue::as_str)
                    .and_then(HttpMethod::from_key)
                else {
                    continue;
                };
                let mut endpoint = Endpoint::new(method, uri);
                endpoint.description = action
                    .get("name")
                    .or_else(|| action.get("description"))
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default()
                    .to_string();
                endpoint.responses = blueprint_action_responses(action);
                endpoints.push(endpoint);
            }
        }
    }
    endpoints
}

fn blueprint_action_responses(action: &JsonValue) -> Vec<ResponseSpec> {
    let mut responses = Vec::new();
    let examples = action
        .get("examples")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for example in examples {
        let specs = example
            .get("responses")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for response in specs {
            let Some(name) = response.get("name").and_then(JsonValue::as_str) else {
                continue;
            };
            responses.push(ResponseSpec {
                status_code: name.to_string(),
                description: String::new(),
                schema: None,
            });
        }
    }
    if responses.is_empty() {
        responses.push(ResponseSpec::ok());
    }
    responses
}

/// Scan for `# Group <name>` headers and `METHOD /path` action lines.
fn scan_blueprint_lines(text: &str) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();
    let mut group: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim();
            if let Some(name) = heading.strip_prefix("Group ") {
                group = Some(name.trim().to_string());
            }
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        // Only uppercase verbs count as action lines, so prose mentioning
        // "get /something" is not misread.
        if !first.chars().all(|c| c.is_ascii_uppercase()) {
            continue;
        }
        let Some(method) = HttpMethod::from_key(first) else {
            continue;
        };
        if !second.starts_with('/') {
            continue;
        }

        let mut endpoint = Endpoint::new(method, second);
        endpoint.description = group.clone().unwrap_or_default();
        endpoint.responses = vec![ResponseSpec::ok()];
        endpoints.push(endpoint);
    }
    endpoints
}

// ---------------------------------------------------------------------------
// `endpoints` array fallback

#[derive(Deserialize)]
struct FallbackItem {
    id: Option<String>,
    path: Option<String>,
    method: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    responses: Vec<ResponseSpec>,
    #[serde(rename = "mcpType")]
    mcp_type: Option<McpRole>,
    selected: Option<bool>,
}

fn extract_endpoints_array(value: &JsonValue) -> Vec<Endpoint> {
    let Some(items) = value.get("endpoints").and_then(JsonValue::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let item: FallbackItem = serde_json::from_value(item.clone()).ok()?;
            let path = item.path.filter(|p| !p.trim().is_empty())?;
            let method = item.method.as_deref().and_then(HttpMethod::from_key)?;
            Some(Endpoint {
                id: item.id.unwrap_or_default(),
                path,
                method,
                description: item.description,
                parameters: item.parameters,
                responses: item.responses,
                mcp_type: item.mcp_type.unwrap_or_else(|| McpRole::default_for(method)),
                selected: item.selected.unwrap_or(true),
            })
        })
        .collect()
}
