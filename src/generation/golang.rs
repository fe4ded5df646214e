//! Go (gorilla/mux) server generation. Direct mode only.

use serde_json::json;

use crate::generation::errors::GenerationError;
use crate::generation::scaffold::{
    self, GenerationPlan, capabilities_json, go_handler_name, server_context,
};
use crate::generation::types::{ServerFile, ServerGenerator};
use crate::model::config::{
    AuthConfig, AuthLocation, AuthScheme, GenerationMode, HostingKind, ServerConfig,
    TargetLanguage,
};
use crate::model::endpoint::{Endpoint, McpRole};
use crate::templates::TemplateRegistry;

#[derive(Debug)]
pub struct GoGenerator {
    mode: GenerationMode,
}

impl GoGenerator {
    pub fn new(mode: GenerationMode) -> Self {
        Self { mode }
    }
}

impl ServerGenerator for GoGenerator {
    fn generate(&self, config: &ServerConfig) -> Result<Vec<ServerFile>, GenerationError> {
        if self.mode == GenerationMode::Proxy {
            return Err(GenerationError::unsupported(
                TargetLanguage::Go,
                GenerationMode::Proxy,
            ));
        }

        let registry = TemplateRegistry::builtin()?;
        let plan = GenerationPlan::new(config);
        let auth = &config.authentication;

        let go_mod = registry.render("go/go.mod", &json!({"server": server_context(config)}))?;

        let main = registry.render(
            "go/main.go",
            &json!({
                "server": server_context(config),
                "capabilities": {"json": capabilities_json(config)},
                "auth": {
                    "goMiddleware": if auth.is_enabled() {
                        middleware_func(auth)
                    } else {
                        String::new()
                    },
                    "goWrap": if auth.is_enabled() {
                        "handler = authMiddleware(handler)"
                    } else {
                        ""
                    },
                },
            }),
        )?;

        let mut handlers = String::new();
        for endpoint in plan.resources.iter().chain(plan.tools.iter()) {
            handlers.push_str(&handler_func(endpoint));
            handlers.push('\n');
        }
        let handlers_go = registry.render(
            "go/handlers.go",
            &json!({"routes": {
                "resourceRegistrations": registration_block(&plan.resources),
                "toolRegistrations": registration_block(&plan.tools),
                "handlers": handlers,
            }}),
        )?;

        let mut files = vec![
            ServerFile::config("", "go.mod", go_mod),
            ServerFile::code("", "main.go", main, TargetLanguage::Go),
            ServerFile::code("", "handlers.go", handlers_go, TargetLanguage::Go),
        ];

        if config.hosting.kind == HostingKind::Container {
            let dockerfile = registry.render("go/dockerfile", &json!({}))?;
            files.push(ServerFile::config("", "Dockerfile", dockerfile));
        }

        files.extend(scaffold::documentation_files(
            config,
            &registry,
            scaffold::default_port(config.language),
        )?);
        Ok(files)
    }
}

/// One `router.HandleFunc(...)` line per endpoint. gorilla/mux takes the
/// `{param}` path template as-is.
fn registration_block(endpoints: &[&Endpoint]) -> String {
    let mut block = String::new();
    for endpoint in endpoints {
        block.push_str(&format!(
            "\trouter.HandleFunc(\"{}\", {}).Methods(\"{}\")\n",
            endpoint.path,
            go_handler_name(endpoint),
            endpoint.method
        ));
    }
    block
}

/// One direct-mode handler func that echoes request data back in the
/// fixed sample envelope.
pub(crate) fn handler_func(endpoint: &Endpoint) -> String {
    let name = go_handler_name(endpoint);
    let path = &endpoint.path;
    let method = endpoint.method;

    let comment = if endpoint.description.is_empty() {
        format!("// {name} handles {method} {path}.\n")
    } else {
        format!("// {name} handles {method} {path}: {}.\n", endpoint.description.trim_end_matches('.'))
    };

    let (envelope_key, prelude, body_entry, text) = if endpoint.mcp_type == McpRole::Tool {
        (
            "result",
            "\tvar body any\n\t_ = json.NewDecoder(r.Body).Decode(&body)\n",
            "\t\t\t\"body\":    body,\n",
            "Sample tool result",
        )
    } else {
        ("data", "", "", "Sample resource data")
    };

    format!(
        "{comment}func {name}(w http.ResponseWriter, r *http.Request) {{\n\tvars := mux.Vars(r)\n\tquery := r.URL.Query()\n{prelude}\twriteJSON(w, http.StatusOK, map[string]any{{\n\t\t\"success\": true,\n\t\t\"{envelope_key}\": map[string]any{{\n\t\t\t\"path\":    \"{path}\",\n\t\t\t\"method\":  \"{method}\",\n\t\t\t\"params\":  vars,\n\t\t\t\"query\":   query,\n{body_entry}\t\t\t\"content\": []map[string]string{{{{\"type\": \"text\", \"text\": \"{text} for {path}\"}}}},\n\t\t}},\n\t}})\n}}\n",
    )
}

/// The full `authMiddleware` func spliced into main.go. Sticks to the
/// imports main.go already has.
pub(crate) fn middleware_func(auth: &AuthConfig) -> String {
    let env_var = auth.secret_env_var().unwrap_or("API_KEY");
    let extract = match auth.scheme {
        AuthScheme::ApiKey => match auth.location() {
            AuthLocation::Header => {
                format!("\t\tprovided := r.Header.Get(\"{}\")\n", auth.key_name())
            }
            AuthLocation::Query => {
                format!(
                    "\t\tprovided := r.URL.Query().Get(\"{}\")\n",
                    auth.key_name()
                )
            }
        },
        AuthScheme::Bearer => concat!(
            "\t\tprovided := r.Header.Get(\"Authorization\")\n",
            "\t\tif len(provided) > 7 {\n",
            "\t\t\tprovided = provided[7:]\n",
            "\t\t}\n",
        )
        .to_string(),
        AuthScheme::Basic => concat!(
            "\t\tuser, pass, _ := r.BasicAuth()\n",
            "\t\tprovided := user + \":\" + pass\n",
        )
        .to_string(),
        AuthScheme::None => "\t\tprovided := \"\"\n".to_string(),
    };

    format!(
        "func authMiddleware(next http.Handler) http.Handler {{\n\treturn http.HandlerFunc(func(w http.ResponseWriter, r *http.Request) {{\n\t\texpected := os.Getenv(\"{env_var}\")\n{extract}\t\tif expected == \"\" || provided != expected {{\n\t\t\tw.Header().Set(\"Content-Type\", \"application/json\")\n\t\t\tw.WriteHeader(http.StatusUnauthorized)\n\t\t\tw.Write([]byte(`{{\"success\": false, \"error\": \"Unauthorized\"}}`))\n\t\t\treturn\n\t\t}}\n\t\tnext.ServeHTTP(w, r)\n\t}})\n}}\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::endpoint::HttpMethod;

    #[test]
    fn test_handler_func_literal() {
        let endpoint = Endpoint::new(HttpMethod::Get, "/widgets");
        let expected = concat!(
            "// GetWidgets handles GET /widgets.\n",
            "func GetWidgets(w http.ResponseWriter, r *http.Request) {\n",
            "\tvars := mux.Vars(r)\n",
            "\tquery := r.URL.Query()\n",
            "\twriteJSON(w, http.StatusOK, map[string]any{\n",
            "\t\t\"success\": true,\n",
            "\t\t\"data\": map[string]any{\n",
            "\t\t\t\"path\":    \"/widgets\",\n",
            "\t\t\t\"method\":  \"GET\",\n",
            "\t\t\t\"params\":  vars,\n",
            "\t\t\t\"query\":   query,\n",
            "\t\t\t\"content\": []map[string]string{{\"type\": \"text\", \"text\": \"Sample resource data for /widgets\"}},\n",
            "\t\t},\n",
            "\t})\n",
            "}\n",
        );
        assert_eq!(handler_func(&endpoint), expected);
    }

    #[test]
    fn test_tool_handler_decodes_body() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/widgets");
        let func = handler_func(&endpoint);
        assert!(func.contains("func PostWidgets("));
        assert!(func.contains("var body any"));
        assert!(func.contains("json.NewDecoder(r.Body).Decode(&body)"));
        assert!(func.contains("\"result\": map[string]any{"));
        assert!(func.contains("\"body\":    body,"));
    }

    #[test]
    fn test_registration_lines() {
        let endpoints = vec![
            Endpoint::new(HttpMethod::Get, "/users/{id}"),
            Endpoint::new(HttpMethod::Get, "/widgets"),
        ];
        let refs: Vec<&Endpoint> = endpoints.iter().collect();
        let block = registration_block(&refs);
        assert!(block.contains(
            "\trouter.HandleFunc(\"/users/{id}\", GetUsersId).Methods(\"GET\")\n"
        ));
        assert!(block.contains(
            "\trouter.HandleFunc(\"/widgets\", GetWidgets).Methods(\"GET\")\n"
        ));
    }

    #[test]
    fn test_middleware_per_scheme() {
        let api_key = AuthConfig {
            scheme: AuthScheme::ApiKey,
            ..Default::default()
        };
        let func = middleware_func(&api_key);
        assert!(func.contains("os.Getenv(\"API_KEY\")"));
        assert!(func.contains("r.Header.Get(\"X-API-Key\")"));

        let bearer = AuthConfig {
            scheme: AuthScheme::Bearer,
            ..Default::default()
        };
        let func = middleware_func(&bearer);
        assert!(func.contains("os.Getenv(\"BEARER_TOKEN\")"));
        assert!(func.contains("provided = provided[7:]"));

        let basic = AuthConfig {
            scheme: AuthScheme::Basic,
            ..Default::default()
        };
        let func = middleware_func(&basic);
        assert!(func.contains("r.BasicAuth()"));
    }

    fn minimal_config() -> ServerConfig {
        let mut config = ServerConfig::new("Widget API", TargetLanguage::Go);
        config.endpoints = vec![
            Endpoint::new(HttpMethod::Get, "/widgets"),
            Endpoint::new(HttpMethod::Post, "/widgets"),
        ];
        config
    }

    #[test]
    fn test_generate_direct_file_set() {
        let config = minimal_config();
        let files = GoGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();

        let paths: Vec<String> = files
            .iter()
            .map(|f| f.full_path().to_string_lossy().into_owned())
            .collect();
        for required in ["go.mod", "main.go", "handlers.go", "README.md"] {
            assert!(paths.contains(&required.to_string()), "missing {required}");
        }

        let main = files.iter().find(|f| f.name == "main.go").unwrap();
        assert!(main.content.contains("const capabilitiesJSON ="));
        assert!(main.content.contains("\"endpointCount\":2"));

        let handlers = files.iter().find(|f| f.name == "handlers.go").unwrap();
        assert!(handlers.content.contains("func GetWidgets("));
        assert!(handlers.content.contains("func PostWidgets("));
    }

    #[test]
    fn test_generate_container_adds_dockerfile() {
        let mut config = minimal_config();
        config.hosting.kind = HostingKind::Container;
        let files = GoGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();
        assert!(files.iter().any(|f| f.name == "Dockerfile"));

        config.hosting.kind = HostingKind::Vm;
        let files = GoGenerator::new(GenerationMode::Direct)
            .generate(&config)
            .unwrap();
        assert!(!files.iter().any(|f| f.name == "Dockerfile"));
    }

    #[test]
    fn test_proxy_mode_is_rejected() {
        let config = minimal_config();
        let err = GoGenerator::new(GenerationMode::Proxy)
            .generate(&config)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnsupportedLanguage {
                language: TargetLanguage::Go,
                mode: GenerationMode::Proxy,
            }
        ));
    }
}
