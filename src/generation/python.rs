//! Python (FastAPI) server generation.

use serde_json::json;

use crate::generation::errors::GenerationError;
use crate::generation::scaffold::{
    self, GenerationPlan, capabilities_context, fastapi_path, handler_base, param_idents,
    server_context,
};
use crate::generation::types::{ServerFile, ServerGenerator};
use crate::model::config::{
    AuthConfig, AuthLocation, AuthScheme, GenerationMode, ServerConfig, TargetLanguage,
};
use crate::model::endpoint::{Endpoint, HttpMethod, McpRole};
use crate::templates::TemplateRegistry;

#[derive(Debug)]
pub struct PythonGenerator {
    mode: GenerationMode,
}

impl PythonGenerator {
    pub fn new(mode: GenerationMode) -> Self {
        Self { mode }
    }
}

impl ServerGenerator for PythonGenerator {
    fn generate(&self, config: &ServerConfig) -> Result<Vec<ServerFile>, GenerationError> {
        let registry = TemplateRegistry::builtin()?;
        let plan = GenerationPlan::new(config);
        let auth = &config.authentication;

        let main = registry.render(
            "python/main.py",
            &json!({
                "server": server_context(config),
                "auth": {
                    "pyImport": if auth.is_enabled() {
                        "from middleware.auth import auth_middleware"
                    } else {
                        ""
                    },
                    "pyUse": if auth.is_enabled() {
                        "app.middleware(\"http\")(auth_middleware)"
                    } else {
                        ""
                    },
                },
                "capabilities": capabilities_context(config),
            }),
        )?;

        let extra_deps = match self.mode {
            GenerationMode::Proxy => "httpx==0.27.0\n",
            GenerationMode::Direct => "",
        };
        let requirements = registry.render(
            "python/requirements.txt",
            &json!({"deps": {"extra": extra_deps}}),
        )?;

        let resources = registry.render(
            "python/resources_routes.py",
            &json!({"routes": {"resources": self.routes_block(config, &plan.resources)}}),
        )?;
        let tools = registry.render(
            "python/tools_routes.py",
            &json!({"routes": {"tools": self.routes_block(config, &plan.tools)}}),
        )?;

        let mut files = vec![
            ServerFile::code("", "main.py", main, TargetLanguage::Python),
            ServerFile::config("", "requirements.txt", requirements),
            ServerFile::code("routes", "resources.py", resources, TargetLanguage::Python),
            ServerFile::code("routes", "tools.py", tools, TargetLanguage::Python),
        ];

        if auth.is_enabled() {
            let middleware = registry.render(
                "python/auth_middleware.py",
                &json!({"auth": {
                    "envVar": auth.secret_env_var().unwrap_or("API_KEY"),
                    "pyExtract": credential_expr(auth),
                }}),
            )?;
            files.push(ServerFile::code(
                "middleware",
                "auth.py",
                middleware,
                TargetLanguage::Python,
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

impl PythonGenerator {
    fn routes_block(&self, config: &ServerConfig, endpoints: &[&Endpoint]) -> String {
        let mut block = String::new();
        if self.mode == GenerationMode::Proxy {
            block.push_str(&format!(
                "import os\n\nimport httpx\nfrom fastapi import Response\n\nUPSTREAM_BASE_URL = os.getenv(\"UPSTREAM_BASE_URL\", \"{}\").rstrip(\"/\")\n\n",
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

fn route_comment(endpoint: &Endpoint) -> String {
    if endpoint.description.is_empty() {
        format!("# {} {}\n", endpoint.method, endpoint.path)
    } else {
        format!(
            "# {} {} - {}\n",
            endpoint.method, endpoint.path, endpoint.description
        )
    }
}

/// `async def get_users_id(request: Request, id: str):` style signature
/// with every path parameter declared alongside the request.
fn signature(endpoint: &Endpoint) -> String {
    let mut sig = String::from("request: Request");
    for (_, ident) in param_idents(endpoint) {
        sig.push_str(&format!(", {ident}: str"));
    }
    sig
}

/// One direct-mode FastAPI route that echoes request data back in the
/// fixed sample envelope.
pub(crate) fn direct_route_snippet(endpoint: &Endpoint) -> String {
    let method = endpoint.method.lower();
    let route = fastapi_path(endpoint);
    let name = handler_base(endpoint);
    let path = &endpoint.path;

    let (envelope_key, prelude, extra, text) = if endpoint.mcp_type == McpRole::Tool {
        (
            "result",
            "    try:\n        body = await request.json()\n    except Exception:\n        body = None\n",
            "            \"body\": body,\n",
            "Sample tool result",
        )
    } else {
        ("data", "", "", "Sample resource data")
    };

    format!(
        "{comment}@router.{method}(\"{route}\")\nasync def {name}({sig}):\n{prelude}    return {{\n        \"success\": True,\n        \"{envelope_key}\": {{\n            \"path\": \"{path}\",\n            \"method\": \"{http_method}\",\n            \"params\": dict(request.path_params),\n            \"query\": dict(request.query_params),\n{extra}            \"content\": [{{\"type\": \"text\", \"text\": \"{text} for {path}\"}}],\n        }},\n    }}\n",
        comment = route_comment(endpoint),
        sig = signature(endpoint),
        http_method = endpoint.method,
    )
}

/// One proxy-mode FastAPI route that forwards the request upstream and
/// relays status and body back.
pub(crate) fn proxy_route_snippet(endpoint: &Endpoint) -> String {
    let method = endpoint.method.lower();
    let route = fastapi_path(endpoint);
    let name = handler_base(endpoint);

    let upstream_path = if endpoint.path_params().is_empty() {
        format!("\"{}\"", endpoint.path)
    } else {
        format!("f\"{}\"", fastapi_path(endpoint))
    };
    let body_line = match endpoint.method {
        HttpMethod::Get | HttpMethod::Head | HttpMethod::Options => "",
        _ => "            content=await request.body(),\n",
    };

    format!(
        "{comment}@router.{method}(\"{route}\")\nasync def {name}({sig}):\n    async with httpx.AsyncClient() as client:\n        upstream = await client.request(\n            \"{http_method}\",\n            UPSTREAM_BASE_URL + {upstream_path},\n            params=dict(request.query_params),\n{body_line}        )\n    return Response(\n        content=upstream.content,\n        status_code=upstream.status_code,\n        media_type=upstream.headers.get(\"content-type\"),\n    )\n",
        comment = route_comment(endpoint),
        sig = signature(endpoint),
        http_method = endpoint.method,
    )
}

/// The expression the auth middleware uses to pull the presented
/// credential off a request.
pub(crate) fn credential_expr(auth: &AuthConfig) -> String {
    match auth.scheme {
        AuthScheme::ApiKey => match auth.location() {
            AuthLocation::Header => {
                format!("request.headers.get(\"{}\")", auth.key_name())
            }
            AuthLocation::Query => {
                format!("request.query_params.get(\"{}\")", auth.key_name())
            }
        },
        AuthScheme::Bearer => {
            "(request.headers.get(\"Authorization\") or \"\").removeprefix(\"Bearer \")"
                .to_string()
        }
        AuthScheme::Basic => {
            "base64.b64decode((request.headers.get(\"Authorization\") or \"\").removeprefix(\"Basic \")).decode(\"utf-8\", \"ignore\")"
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
            "# GET /widgets\n",
            "@router.get(\"/widgets\")\n",
            "async def get_widgets(request: Request):\n",
            "    return {\n",
            "        \"success\": True,\n",
            "        \"data\": {\n",
            "            \"path\": \"/widgets\",\n",
            "            \"method\": \"GET\",\n",
            "            \"params\": dict(request.path_params),\n",
            "            \"query\": dict(request.query_params),\n",
            "            \"content\": [{\"type\": \"text\", \"text\": \"Sample resource data for /widgets\"}],\n",
            "        },\n",
            "    }\n",
        );
        assert_eq!(direct_route_snippet(&endpoint), expected);
    }

    #[test]
    fn test_direct_tool_snippet_reads_body() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/widgets");
        let snippet = direct_route_snippet(&endpoint);
        assert!(snippet.contains("@router.post(\"/widgets\")"));
        assert!(snippet.contains("body = await request.json()"));
        assert!(snippet.contains("\"result\": {"));
        assert!(snippet.contains("\"body\": body,"));
        assert!(snippet.contains("Sample tool result for /widgets"));
    }

    #[test]
    fn test_path_params_in_signature() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/users/{user-id}");
        let snippet = direct_route_snippet(&endpoint);
        assert!(snippet.contains("@router.get(\"/users/{user_id}\")"));
        assert!(snippet.contains("async def get_users_user_id(request: Request, user_id: str):"));
    }

    #[test]
    fn test_proxy_snippet_forwards_upstream() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/users/{id}");
        let snippet = proxy_route_snippet(&endpoint);
        assert!(snippet.contains("UPSTREAM_BASE_URL + f\"/users/{id}\""));
        assert!(snippet.contains("content=await request.body(),"));
        assert!(snippet.contains("status_code=upstream.status_code,"));
    }

    #[test]
    fn test_proxy_get_omits_body() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/widgets");
        let snippet = proxy_route_snippet(&endpoint);
        assert!(snippet.contains("UPSTREAM_BASE_URL + \"/widgets\""));
        assert!(!snippet.contains("content=await request.body()"));
    }

    #[test]
    fn test_credential_expressions() {
        let api_key = AuthConfig {
            scheme: AuthScheme::ApiKey,
            ..Default::default()
        };
        assert_eq!(
            credential_expr(&api_key),
            "request.headers.get(\"X-API-Key\")"
        );

        let query_key = AuthConfig {
            scheme: AuthScheme::ApiKey,
            location: Some(AuthLocation::Query),
            ..Default::default()
        };
        assert_eq!(
            credential_expr(&query_key),
            "request.query_params.get(\"api_key\")"
        );

        let basic = AuthConfig {
            scheme: AuthScheme::Basic,
            ..Default::default()
        };
        assert!(credential_expr(&basic).contains("base64.b64decode"));
    }

    fn minimal_config(mode: GenerationMode) -> ServerConfig {
        let mut config = ServerConfig::new("Widget API", TargetLanguage::Python);
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
        let files = PythonGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();

        let paths: Vec<String> = files
            .iter()
            .map(|f| f.full_path().to_string_lossy().into_owned())
            .collect();
        for required in [
            "main.py",
            "requirements.txt",
            "routes/resources.py",
            "routes/tools.py",
            "README.md",
        ] {
            assert!(paths.contains(&required.to_string()), "missing {required}");
        }
        assert!(!paths.contains(&"middleware/auth.py".to_string()));

        let requirements = files
            .iter()
            .find(|f| f.name == "requirements.txt")
            .unwrap();
        assert!(!requirements.content.contains("httpx"));
    }

    #[test]
    fn test_generate_with_auth_emits_middleware() {
        let mut config = minimal_config(GenerationMode::Direct);
        config.authentication.scheme = AuthScheme::Bearer;
        let files = PythonGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();

        let middleware = files
            .iter()
            .find(|f| f.name == "auth.py")
            .expect("auth middleware file");
        assert_eq!(middleware.path, "middleware");
        assert!(middleware.content.contains("os.getenv(\"BEARER_TOKEN\")"));
        assert!(middleware.content.contains("removeprefix(\"Bearer \")"));

        let main = files.iter().find(|f| f.name == "main.py").unwrap();
        assert!(main
            .content
            .contains("from middleware.auth import auth_middleware"));
        assert!(main
            .content
            .contains("app.middleware(\"http\")(auth_middleware)"));
    }

    #[test]
    fn test_generate_proxy_adds_httpx() {
        let config = minimal_config(GenerationMode::Proxy);
        let files = PythonGenerator::new(GenerationMode::Proxy)
            .generate(&config)
            .unwrap();

        let requirements = files
            .iter()
            .find(|f| f.name == "requirements.txt")
            .unwrap();
        assert!(requirements.content.contains("httpx==0.27.0"));

        let routes = files.iter().find(|f| f.name == "resources.py").unwrap();
        assert!(routes.content.contains("UPSTREAM_BASE_URL"));
        assert!(routes.content.contains("httpx.AsyncClient()"));
    }
}
