//! TypeScript (Express) server generation.

use serde_json::json;

use crate::generation::errors::GenerationError;
use crate::generation::scaffold::{
    self, GenerationPlan, capabilities_context, express_path, sanitize_param, server_context,
};
use crate::generation::types::{ServerFile, ServerGenerator};
use crate::model::config::{
    AuthConfig, AuthLocation, AuthScheme, GenerationMode, ServerConfig, TargetLanguage,
};
use crate::model::endpoint::{Endpoint, HttpMethod, McpRole};
use crate::templates::TemplateRegistry;

#[derive(Debug)]
pub struct TypeScriptGenerator {
    mode: GenerationMode,
}

impl TypeScriptGenerator {
    pub fn new(mode: GenerationMode) -> Self {
        Self { mode }
    }
}

impl ServerGenerator for TypeScriptGenerator {
    fn generate(&self, config: &ServerConfig) -> Result<Vec<ServerFile>, GenerationError> {
        let registry = TemplateRegistry::builtin()?;
        let plan = GenerationPlan::new(config);
        let auth = &config.authentication;

        let package_json = registry.render(
            "typescript/package.json",
            &json!({"server": server_context(config)}),
        )?;
        let tsconfig = registry.render("typescript/tsconfig.json", &json!({}))?;

        let index = registry.render(
            "typescript/index.ts",
            &json!({
                "server": server_context(config),
                "auth": {
                    "tsImport": if auth.is_enabled() {
                        "import { authMiddleware } from \"./middleware/authMiddleware\";\n"
                    } else {
                        ""
                    },
                    "tsUse": if auth.is_enabled() {
                        "app.use(authMiddleware);\n"
                    } else {
                        ""
                    },
                },
                "capabilities": capabilities_context(config),
            }),
        )?;

        let resource_routes = registry.render(
            "typescript/resource_routes.ts",
            &json!({"routes": {"resources": self.routes_block(config, &plan.resources)}}),
        )?;
        let tool_routes = registry.render(
            "typescript/tool_routes.ts",
            &json!({"routes": {"tools": self.routes_block(config, &plan.tools)}}),
        )?;

        let mut files = vec![
            ServerFile::config("", "package.json", package_json),
            ServerFile::config("", "tsconfig.json", tsconfig),
            ServerFile::code("src", "index.ts", index, TargetLanguage::TypeScript),
            ServerFile::code(
                "src/routes",
                "resourceRoutes.ts",
                resource_routes,
                TargetLanguage::TypeScript,
            ),
            ServerFile::code(
                "src/routes",
                "toolRoutes.ts",
                tool_routes,
                TargetLanguage::TypeScript,
            ),
        ];

        if auth.is_enabled() {
            let middleware = registry.render(
                "typescript/auth_middleware.ts",
                &json!({"auth": {
                    "envVar": auth.secret_env_var().unwrap_or("API_KEY"),
                    "tsExtract": credential_expr(auth),
                }}),
            )?;
            files.push(ServerFile::code(
                "src/middleware",
                "authMiddleware.ts",
                middleware,
                TargetLanguage::TypeScript,
            ));
        }

        files.extend(scaffold::documentation_files(
            config,
            &registry,
            scaffold::default_port(config.language),
        )?);
        Ok(files)
    }
}

impl TypeScriptGenerator {
    fn routes_block(&self, config: &ServerConfig, endpoints: &[&Endpoint]) -> String {
        let mut block = String::new();
        if self.mode == GenerationMode::Proxy {
            block.push_str(&format!(
                "const UPSTREAM_BASE_URL = (process.env.UPSTREAM_BASE_URL || \"{}\").replace(/\\/+$/, \"\");\n\n",
                scaffold::upstream_base_url(config)
            ));
        }
        for endpoint in endpoints {
            let snippet = match self.mode {
                GenerationMode::Direct => direct_route_snippet(endpoint),
                GenerationMode::Proxy => proxy_route_snippet(endpoint),
            };
            block.push_str(&snippet);
            block.push('\n');
        }
        block
    }
}

/// The TS expression rebuilding an endpoint path from `req.params`, e.g.
/// `"/users/" + req.params.id + "/posts"`.
fn path_expr(endpoint: &Endpoint) -> String {
    let mut parts = Vec::new();
    let mut rest = endpoint.path.as_str();
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let literal = &rest[..open];
        if !literal.is_empty() {
            parts.push(format!("\"{literal}\""));
        }
        parts.push(format!("req.params.{}", sanitize_param(&rest[open + 1..open + close])));
        rest = &rest[open + close + 1..];
    }
    if !rest.is_empty() {
        parts.push(format!("\"{rest}\""));
    }
    if parts.is_empty() {
        parts.push("\"/\"".to_string());
    }
    parts.join(" + ")
}

fn route_comment(endpoint: &Endpoint) -> String {
    if endpoint.description.is_empty() {
        format!("// {} {}\n", endpoint.method, endpoint.path)
    } else {
        format!(
            "// {} {} - {}\n",
            endpoint.method, endpoint.path, endpoint.description
        )
    }
}

/// One direct-mode Express route that echoes request data back in the
/// fixed sample envelope.
pub(crate) fn direct_route_snippet(endpoint: &Endpoint) -> String {
    let method = endpoint.method.lower();
    let route = express_path(endpoint);
    let path = &endpoint.path;

    let (envelope_key, extra, text) = if endpoint.mcp_type == McpRole::Tool {
        ("result", "      body: req.body,\n", "Sample tool result")
    } else {
        ("data", "", "Sample resource data")
    };

    format!(
        "{comment}router.{method}(\"{route}\", (req: Request, res: Response) => {{\n  res.json({{\n    success: true,\n    {envelope_key}: {{\n      path: \"{path}\",\n      method: \"{http_method}\",\n      params: req.params,\n      query: req.query,\n{extra}      content: [{{ type: \"text\", text: \"{text} for {path}\" }}]\n    }}\n  }});\n}});\n",
        comment = route_comment(endpoint),
        http_method = endpoint.method,
    )
}

/// One proxy-mode Express route that forwards the request upstream and
/// relays status and body back.
pub(crate) fn proxy_route_snippet(endpoint: &Endpoint) -> String {
    let method = endpoint.method.lower();
    let route = express_path(endpoint);
    let upstream_expr = path_expr(endpoint);

    let body_line = match endpoint.method {
        HttpMethod::Get | HttpMethod::Head | HttpMethod::Options => String::new(),
        _ => "      body: JSON.stringify(req.body ?? {}),\n".to_string(),
    };

    format!(
        "{comment}router.{method}(\"{route}\", async (req: Request, res: Response) => {{\n  try {{\n    const upstream = new URL(UPSTREAM_BASE_URL + {upstream_expr});\n    for (const [key, value] of Object.entries(req.query)) {{\n      upstream.searchParams.append(key, String(value));\n    }}\n    const response = await fetch(upstream, {{\n      method: \"{http_method}\",\n      headers: {{ \"content-type\": \"application/json\" }},\n{body_line}    }});\n    const payload = await response.text();\n    res.status(response.status).send(payload);\n  }} catch (err) {{\n    res.status(502).json({{ success: false, error: String(err) }});\n  }}\n}});\n",
        comment = route_comment(endpoint),
        http_method = endpoint.method,
    )
}

/// The expression the auth middleware uses to pull the presented
/// credential off a request.
pub(crate) fn credential_expr(auth: &AuthConfig) -> String {
    match auth.scheme {
        AuthScheme::ApiKey => match auth.location() {
            AuthLocation::Header => format!("req.header(\"{}\") ?? \"\"", auth.key_name()),
            AuthLocation::Query => {
                format!("String(req.query[\"{}\"] ?? \"\")", auth.key_name())
            }
        },
        AuthScheme::Bearer => {
            "(req.header(\"Authorization\") ?? \"\").replace(/^Bearer /, \"\")".to_string()
        }
        AuthScheme::Basic => {
            "Buffer.from((req.header(\"Authorization\") ?? \"\").replace(/^Basic /, \"\"), \"base64\").toString(\"utf8\")"
                .to_string()
        }
        AuthScheme::None => "\"\"".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::endpoint::HttpMethod;

    #[test]
    fn test_direct_resource_snippet_literal() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/widgets");
        let expected = concat!(
            "// GET /widgets\n",
            "router.get(\"/widgets\", (req: Request, res: Response) => {\n",
            "  res.json({\n",
            "    success: true,\n",
            "    data: {\n",
            "      path: \"/widgets\",\n",
            "      method: \"GET\",\n",
            "      params: req.params,\n",
            "      query: req.query,\n",
            "      content: [{ type: \"text\", text: \"Sample resource data for /widgets\" }]\n",
            "    }\n",
            "  });\n",
            "});\n",
        );
        assert_eq!(direct_route_snippet(&endpoint), expected);
    }

    #[test]
    fn test_direct_tool_snippet_includes_body() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/widgets");
        let snippet = direct_route_snippet(&endpoint);
        assert!(snippet.contains("router.post(\"/widgets\""));
        assert!(snippet.contains("result: {"));
        assert!(snippet.contains("body: req.body,"));
        assert!(snippet.contains("Sample tool result for /widgets"));
    }

    #[test]
    fn test_path_params_become_express_style() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/users/{id}");
        let snippet = direct_route_snippet(&endpoint);
        assert!(snippet.contains("router.get(\"/users/:id\""));
        // The envelope reports the original template path.
        assert!(snippet.contains("path: \"/users/{id}\""));
    }

    #[test]
    fn test_proxy_snippet_forwards_upstream() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/users/{id}");
        let snippet = proxy_route_snippet(&endpoint);
        assert!(snippet.contains(
            "const upstream = new URL(UPSTREAM_BASE_URL + \"/users/\" + req.params.id);"
        ));
        assert!(snippet.contains("method: \"POST\""));
        assert!(snippet.contains("body: JSON.stringify(req.body ?? {})"));
        assert!(snippet.contains("res.status(502)"));
    }

    #[test]
    fn test_proxy_get_omits_body() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/widgets");
        assert!(!proxy_route_snippet(&endpoint).contains("JSON.stringify"));
    }

    #[test]
    fn test_path_expr_variants() {
        assert_eq!(
            path_expr(&Endpoint::new(HttpMethod::Get, "/widgets")),
            "\"/widgets\""
        );
        assert_eq!(
            path_expr(&Endpoint::new(HttpMethod::Get, "/users/{id}/posts")),
            "\"/users/\" + req.params.id + \"/posts\""
        );
        assert_eq!(path_expr(&Endpoint::new(HttpMethod::Get, "/")), "\"/\"");
    }

    #[test]
    fn test_credential_expressions() {
        let api_key = AuthConfig {
            scheme: AuthScheme::ApiKey,
            ..Default::default()
        };
        assert_eq!(credential_expr(&api_key), "req.header(\"X-API-Key\") ?? \"\"");

        let query_key = AuthConfig {
            scheme: AuthScheme::ApiKey,
            location: Some(AuthLocation::Query),
            name: Some("token".to_string()),
            ..Default::default()
        };
        assert_eq!(
            credential_expr(&query_key),
            "String(req.query[\"token\"] ?? \"\")"
        );

        let bearer = AuthConfig {
            scheme: AuthScheme::Bearer,
            ..Default::default()
        };
        assert!(credential_expr(&bearer).contains("^Bearer "));
    }

    fn minimal_config(mode: GenerationMode) -> ServerConfig {
        let mut config = ServerConfig::new("Widget API", TargetLanguage::TypeScript);
        config.mode = mode;
        config.endpoints = vec![
            Endpoint::new(HttpMethod::Get, "/widgets"),
            Endpoint::new(HttpMethod::Post, "/widgets"),
        ];
        config
    }

    #[test]
    fn test_generate_direct_no_auth_file_set() {
        let config = minimal_config(GenerationMode::Direct);
        let files = TypeScriptGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();

        let paths: Vec<String> = files
            .iter()
            .map(|f| f.full_path().to_string_lossy().into_owned())
            .collect();
        for required in [
            "package.json",
            "tsconfig.json",
            "src/index.ts",
            "src/routes/resourceRoutes.ts",
            "src/routes/toolRoutes.ts",
            "README.md",
        ] {
            assert!(paths.contains(&required.to_string()), "missing {required}");
        }
        // No auth configured, no middleware file.
        assert!(!paths.iter().any(|p| p.contains("authMiddleware")));

        let resource_routes = files
            .iter()
            .find(|f| f.name == "resourceRoutes.ts")
            .unwrap();
        assert!(resource_routes.content.contains("router.get(\"/widgets\""));
        let tool_routes = files.iter().find(|f| f.name == "toolRoutes.ts").unwrap();
        assert!(tool_routes.content.contains("router.post(\"/widgets\""));
    }

    #[test]
    fn test_generate_with_auth_emits_middleware() {
        let mut config = minimal_config(GenerationMode::Direct);
        config.authentication.scheme = AuthScheme::ApiKey;
        let files = TypeScriptGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();

        let middleware = files
            .iter()
            .find(|f| f.name == "authMiddleware.ts")
            .expect("auth middleware file");
        assert_eq!(middleware.path, "src/middleware");
        assert!(middleware.content.contains("process.env.API_KEY"));
        assert!(middleware.content.contains("X-API-Key"));

        let index = files.iter().find(|f| f.name == "index.ts").unwrap();
        assert!(index.content.contains("app.use(authMiddleware);"));
    }

    #[test]
    fn test_generate_proxy_declares_upstream() {
        let config = minimal_config(GenerationMode::Proxy);
        let files = TypeScriptGenerator::new(GenerationMode::Proxy)
            .generate(&config)
            .unwrap();
        let routes = files
            .iter()
            .find(|f| f.name == "resourceRoutes.ts")
            .unwrap();
        assert!(routes.content.contains("const UPSTREAM_BASE_URL"));
        assert!(routes.content.contains("await fetch(upstream"));
    }
}
