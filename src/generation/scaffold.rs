//! Shared generation machinery: endpoint partitioning, template contexts,
//! naming and path conversion, and the documentation files every language
//! emits.
//!
//! Per-endpoint code snippets are built by the language modules; this
//! module owns everything the three of them would otherwise duplicate.

use serde_json::{Value as JsonValue, json};

use crate::core::utils::to_pascal_case;
use crate::generation::errors::GenerationError;
use crate::generation::types::ServerFile;
use crate::model::config::{AuthScheme, GenerationMode, ServerConfig, TargetLanguage};
use crate::model::endpoint::{Endpoint, McpRole};
use crate::templates::TemplateRegistry;

/// The route-generation view of a config: endpoints split by role, with
/// unselected and role-less endpoints excluded. The capability listing
/// deliberately ignores this split and counts everything.
pub struct GenerationPlan<'a> {
    pub config: &'a ServerConfig,
    pub resources: Vec<&'a Endpoint>,
    pub tools: Vec<&'a Endpoint>,
}

impl<'a> GenerationPlan<'a> {
    pub fn new(config: &'a ServerConfig) -> Self {
        let included = |role: McpRole| {
            config
                .endpoints
                .iter()
                .filter(move |e| e.selected && e.mcp_type == role)
                .collect::<Vec<_>>()
        };
        Self {
            config,
            resources: included(McpRole::Resource),
            tools: included(McpRole::Tool),
        }
    }
}

/// Base handler name: lowercased method plus the path with every
/// non-alphanumeric run collapsed to one underscore. `GET /users/{id}`
/// becomes `get_users_id`.
pub fn handler_base(endpoint: &Endpoint) -> String {
    let mut name = format!("{}_{}", endpoint.method.lower(), endpoint.path);
    name = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let mut collapsed = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed.trim_matches('_').to_string()
}

/// Go handler name. `GET /users/{id}` becomes `GetUsersId`.
pub fn go_handler_name(endpoint: &Endpoint) -> String {
    to_pascal_case(&handler_base(endpoint))
}

pub(crate) fn sanitize_param(name: &str) -> String {
    let ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("p{ident}")
    } else if ident.is_empty() {
        "param".to_string()
    } else {
        ident
    }
}

/// Path parameter names paired with identifier-safe forms, in path order.
pub fn param_idents(endpoint: &Endpoint) -> Vec<(String, String)> {
    endpoint
        .path_params()
        .into_iter()
        .map(|raw| (raw.to_string(), sanitize_param(raw)))
        .collect()
}

/// Express route path: `{param}` placeholders become `:param`.
pub fn express_path(endpoint: &Endpoint) -> String {
    let mut path = endpoint.path.clone();
    for (raw, ident) in param_idents(endpoint) {
        path = path.replace(&format!("{{{raw}}}"), &format!(":{ident}"));
    }
    path
}

/// FastAPI route path: parameter names normalized to valid identifiers.
pub fn fastapi_path(endpoint: &Endpoint) -> String {
    let mut path = endpoint.path.clone();
    for (raw, ident) in param_idents(endpoint) {
        path = path.replace(&format!("{{{raw}}}"), &format!("{{{ident}}}"));
    }
    path
}

/// Port each generated server listens on by default.
pub fn default_port(language: TargetLanguage) -> u16 {
    match language {
        TargetLanguage::TypeScript => 3000,
        TargetLanguage::Python => 8000,
        TargetLanguage::Go => 8080,
    }
}

// ---------------------------------------------------------------------------
// Template contexts

pub fn server_context(config: &ServerConfig) -> JsonValue {
    json!({
        "name": config.name,
        "slug": config.slug(),
        "description": config.description,
        "language": config.language.as_str(),
        "languageDisplay": config.language.display_name(),
        "mode": config.mode.as_str(),
    })
}

fn capability_entries(config: &ServerConfig, role: McpRole) -> JsonValue {
    let entries: Vec<JsonValue> = config
        .endpoints
        .iter()
        .filter(|e| e.mcp_type == role)
        .map(|e| {
            json!({
                "name": e.id,
                "path": e.path,
                "method": e.method.as_str(),
                "description": e.description,
            })
        })
        .collect();
    JsonValue::Array(entries)
}

/// Capability listing context: every endpoint counts here, including the
/// unselected and role-less ones that route generation skips.
pub fn capabilities_context(config: &ServerConfig) -> JsonValue {
    json!({
        "count": config.endpoints.len(),
        "resources": capability_entries(config, McpRole::Resource),
        "tools": capability_entries(config, McpRole::Tool),
    })
}

/// The whole capability listing as one compact JSON string, for targets
/// that embed it as a constant instead of a literal.
pub fn capabilities_json(config: &ServerConfig) -> String {
    json!({
        "name": config.name,
        "description": config.description,
        "endpointCount": config.endpoints.len(),
        "resources": capability_entries(config, McpRole::Resource),
        "tools": capability_entries(config, McpRole::Tool),
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Documentation files

fn markdown_cell(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text.replace('|', "\\|")
    }
}

/// Markdown table over every endpoint with its parameters and responses.
pub fn endpoint_table(endpoints: &[Endpoint]) -> String {
    let mut table = String::from(
        "| Method | Path | Role | Parameters | Responses |\n|---|---|---|---|---|\n",
    );
    for endpoint in endpoints {
        let params = endpoint
            .parameters
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}: {} (required)", p.name, p.param_type.as_str())
                } else {
                    format!("{}: {}", p.name, p.param_type.as_str())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let responses = endpoint
            .responses
            .iter()
            .map(|r| r.status_code.clone())
            .collect::<Vec<_>>()
            .join(", ");
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            endpoint.method,
            markdown_cell(&endpoint.path),
            endpoint.mcp_type,
            markdown_cell(&params),
            markdown_cell(&responses),
        ));
    }
    table
}

fn auth_readme(config: &ServerConfig) -> String {
    let auth = &config.authentication;
    match auth.scheme {
        AuthScheme::None => "No authentication is configured.".to_string(),
        AuthScheme::ApiKey => {
            let location = match auth.location() {
                crate::model::config::AuthLocation::Header => "header",
                crate::model::config::AuthLocation::Query => "query parameter",
            };
            format!(
                "API Key authentication via the `{}` {location}. Set the expected key in the `{}` environment variable.",
                auth.key_name(),
                auth.secret_env_var().unwrap_or("API_KEY"),
            )
        }
        AuthScheme::Bearer => format!(
            "Bearer token authentication via the `Authorization` header. Set the expected token in the `{}` environment variable.",
            auth.secret_env_var().unwrap_or("BEARER_TOKEN"),
        ),
        AuthScheme::Basic => format!(
            "HTTP Basic authentication. Set the expected `user:password` pair in the `{}` environment variable.",
            auth.secret_env_var().unwrap_or("BASIC_AUTH_CREDENTIALS"),
        ),
    }
}

fn env_entries(config: &ServerConfig, default_port: u16) -> String {
    let mut entries = vec![format!("PORT={default_port}")];
    if let Some(var) = config.authentication.secret_env_var() {
        entries.push(format!("{var}=change-me"));
    }
    if config.mode == GenerationMode::Proxy {
        let base = config
            .hosting
            .proxy_base_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "https://api.example.com".to_string());
        entries.push(format!("UPSTREAM_BASE_URL={base}"));
    }
    entries.join("\n") + "\n"
}

fn run_instructions(language: TargetLanguage, mode: GenerationMode) -> String {
    let commands = match language {
        TargetLanguage::TypeScript => "```bash\nnpm install\nnpm run build\nnpm start\n```",
        TargetLanguage::Python => {
            "```bash\npip install -r requirements.txt\npython main.py\n```"
        }
        TargetLanguage::Go => "```bash\ngo mod tidy\ngo run .\n```",
    };
    match mode {
        GenerationMode::Direct => commands.to_string(),
        GenerationMode::Proxy => format!(
            "{commands}\n\nThis server proxies requests to the upstream API; set `UPSTREAM_BASE_URL` before starting."
        ),
    }
}

/// README.md and .env.example, shared across all languages.
pub fn documentation_files(
    config: &ServerConfig,
    registry: &TemplateRegistry,
    default_port: u16,
) -> Result<Vec<ServerFile>, GenerationError> {
    let readme = registry.render(
        "common/readme.md",
        &json!({
            "server": server_context(config),
            "auth": {"readme": auth_readme(config)},
            "endpoints": {"table": endpoint_table(&config.endpoints)},
            "run": {"instructions": run_instructions(config.language, config.mode)},
        }),
    )?;
    let env_example = registry.render(
        "common/env_example",
        &json!({
            "server": server_context(config),
            "env": {"entries": env_entries(config, default_port)},
        }),
    )?;

    Ok(vec![
        ServerFile::documentation("", "README.md", readme),
        ServerFile::config("", ".env.example", env_example),
    ])
}

/// Default upstream base URL expression data for proxy servers.
pub fn upstream_base_url(config: &ServerConfig) -> String {
    config
        .hosting
        .proxy_base_url
        .as_ref()
        .map(|u| u.to_string().trim_end_matches('/').to_string())
        .unwrap_or_else(|| "https://api.example.com".to_string())
}
