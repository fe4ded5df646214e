//! Cross-module generation checks: the support matrix against the
//! conformance layout rules, middleware placement policy, and the path
//! from a raw definition to generated route files.

use mcpforge::generation::{conformance, generate_server_code, supported_languages};
use mcpforge::ingest::{ApiFormat, RawContent, detect, extract, parse};
use mcpforge::model::config::{
    AuthConfig, AuthScheme, GenerationMode, SecretValue, ServerConfig, TargetLanguage,
};
use mcpforge::model::endpoint::{Endpoint, HttpMethod};

fn minimal_config(language: TargetLanguage, mode: GenerationMode) -> ServerConfig {
    let mut config = ServerConfig::new("Conformance Server", language);
    config.mode = mode;
    config.endpoints = vec![
        Endpoint::new(HttpMethod::Get, "/widgets"),
        Endpoint::new(HttpMethod::Post, "/widgets"),
    ];
    config
}

fn generated_files(config: &ServerConfig) -> Vec<mcpforge::generation::ServerFile> {
    let result = generate_server_code(config);
    assert!(result.success, "{:?}", result.error);
    result.files.expect("successful generation carries files")
}

#[test]
fn test_supported_matrix_emits_required_files() {
    for mode in [GenerationMode::Direct, GenerationMode::Proxy] {
        for language in supported_languages(mode) {
            let config = minimal_config(language, mode);
            let files = generated_files(&config);

            let missing = conformance::verify_layout(&config, &files);
            assert!(missing.is_empty(), "{language} {mode} missing {missing:?}");

            for required in conformance::required_files(language) {
                assert!(
                    files
                        .iter()
                        .any(|f| f.full_path().display().to_string() == *required),
                    "{language} {mode} lacks {required}"
                );
            }
        }
    }
}

#[test]
fn test_auth_middleware_placement_per_language() {
    let auth = AuthConfig {
        scheme: AuthScheme::Bearer,
        ..Default::default()
    };

    let mut typescript = minimal_config(TargetLanguage::TypeScript, GenerationMode::Direct);
    typescript.authentication = auth.clone();
    assert!(
        generated_files(&typescript)
            .iter()
            .any(|f| f.full_path() == std::path::Path::new("src/middleware/authMiddleware.ts"))
    );

    let mut python = minimal_config(TargetLanguage::Python, GenerationMode::Direct);
    python.authentication = auth.clone();
    assert!(
        generated_files(&python)
            .iter()
            .any(|f| f.full_path() == std::path::Path::new("middleware/auth.py"))
    );

    // Go inlines the middleware in main.go instead of a separate file.
    let mut golang = minimal_config(TargetLanguage::Go, GenerationMode::Direct);
    golang.authentication = auth;
    let files = generated_files(&golang);
    assert!(!files.iter().any(|f| f.path.contains("middleware")));
    let main_go = files.iter().find(|f| f.name == "main.go").unwrap();
    assert!(main_go.content.contains("func authMiddleware"));
    assert!(main_go.content.contains("os.Getenv(\"BEARER_TOKEN\")"));

    // With auth disabled none of the languages emit middleware.
    for language in TargetLanguage::all() {
        let config = minimal_config(*language, GenerationMode::Direct);
        assert!(
            !generated_files(&config)
                .iter()
                .any(|f| f.full_path().display().to_string().contains("middleware")
                    || f.content.contains("authMiddleware")),
            "{language} emitted middleware without auth"
        );
    }
}

#[test]
fn test_secret_never_lands_in_generated_output() {
    for language in [
        TargetLanguage::TypeScript,
        TargetLanguage::Python,
        TargetLanguage::Go,
    ] {
        let mut config = minimal_config(language, GenerationMode::Direct);
        config.authentication = AuthConfig {
            scheme: AuthScheme::ApiKey,
            location: None,
            name: None,
            value: Some(SecretValue::new("super-secret-credential")),
        };
        for file in generated_files(&config) {
            assert!(
                !file.content.contains("super-secret-credential"),
                "{language}: {} leaks the configured secret",
                file.full_path().display()
            );
        }
    }
}

#[test]
fn test_widgets_definition_to_generated_routes() {
    let text = r#"{
        "openapi": "3.0.1",
        "info": {"title": "Widgets", "version": "1.0.0"},
        "paths": {
            "/widgets": {
                "get": {"summary": "List widgets"},
                "post": {"summary": "Create widget"}
            }
        }
    }"#;
    let content = RawContent::from(text);
    let parsed = parse(&content, detect(&content, None)).unwrap();
    let endpoints = extract(&parsed, ApiFormat::OpenApi3);
    assert_eq!(endpoints.len(), 2);

    let mut config = ServerConfig::new("Widget Server", TargetLanguage::TypeScript);
    config.endpoints = endpoints;
    let files = generated_files(&config);

    // The GET landed in resource routes, the POST in tool routes.
    let resource_routes = files
        .iter()
        .find(|f| f.full_path() == std::path::Path::new("src/routes/resourceRoutes.ts"))
        .unwrap();
    assert!(resource_routes.content.contains("router.get(\"/widgets\""));

    let tool_routes = files
        .iter()
        .find(|f| f.full_path() == std::path::Path::new("src/routes/toolRoutes.ts"))
        .unwrap();
    assert!(tool_routes.content.contains("router.post(\"/widgets\""));

    assert!(!files.iter().any(|f| f.name == "authMiddleware.ts"));
}
