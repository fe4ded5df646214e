//! Hosting-provider manifest synthesis.
//!
//! Wraps a generated file set with the manifest its hosting target
//! expects. Manifests are built the same way the generators build
//! source: by string assembly, one snippet function per provider,
//! testable against literal expected output.

use serde_json::json;

use crate::deploy::DeployError;
use crate::generation::scaffold::default_port;
use crate::generation::types::ServerFile;
use crate::model::config::{HostingKind, HostingProvider, ServerConfig, TargetLanguage};

/// The manifest file for a hosting target, chosen by provider and kind.
pub fn manifest(config: &ServerConfig) -> Result<ServerFile, DeployError> {
    let file = match (config.hosting.provider, config.hosting.kind) {
        (HostingProvider::Aws, HostingKind::Serverless) => ServerFile::config(
            "",
            "serverless.yml",
            serverless_manifest(config),
        ),
        (HostingProvider::Aws, _) => {
            ServerFile::config("", "taskdef.json", ecs_manifest(config)?)
        }
        (HostingProvider::Gcp, _) => {
            ServerFile::config("", "app.yaml", app_engine_manifest(config))
        }
        (HostingProvider::Azure, _) => ServerFile::config("", "host.json", host_manifest()?),
        (HostingProvider::SelfHosted, _) => {
            ServerFile::config("", "docker-compose.yml", compose_manifest(config))
        }
    };
    Ok(file)
}

/// Appends the provider manifest to an already generated file set.
pub fn package(
    config: &ServerConfig,
    mut files: Vec<ServerFile>,
) -> Result<Vec<ServerFile>, DeployError> {
    if files.is_empty() {
        return Err(DeployError::EmptyBundle);
    }
    files.push(manifest(config)?);
    Ok(files)
}

fn lambda_runtime(language: TargetLanguage) -> &'static str {
    match language {
        TargetLanguage::TypeScript => "nodejs20.x",
        TargetLanguage::Python => "python3.12",
        TargetLanguage::Go => "provided.al2023",
    }
}

fn app_engine_runtime(language: TargetLanguage) -> &'static str {
    match language {
        TargetLanguage::TypeScript => "nodejs20",
        TargetLanguage::Python => "python312",
        TargetLanguage::Go => "go122",
    }
}

fn serverless_manifest(config: &ServerConfig) -> String {
    let handler = match config.language {
        TargetLanguage::TypeScript => "dist/index.handler",
        TargetLanguage::Python => "main.app",
        TargetLanguage::Go => "bootstrap",
    };
    format!(
        "service: {slug}\n\nprovider:\n  name: aws\n  runtime: {runtime}\n  region: {region}\n\nfunctions:\n  server:\n    handler: {handler}\n    events:\n      - httpApi: \"*\"\n",
        slug = config.slug(),
        runtime = lambda_runtime(config.language),
        region = config.hosting.region.as_deref().unwrap_or("us-east-1"),
    )
}

fn ecs_manifest(config: &ServerConfig) -> Result<String, DeployError> {
    let slug = config.slug();
    let port = default_port(config.language);
    let manifest = json!({
        "family": slug,
        "networkMode": "awsvpc",
        "requiresCompatibilities": ["FARGATE"],
        "cpu": "256",
        "memory": "512",
        "containerDefinitions": [{
            "name": slug,
            "image": format!("{slug}:latest"),
            "essential": true,
            "portMappings": [{"containerPort": port, "protocol": "tcp"}],
        }],
    });
    Ok(serde_json::to_string_pretty(&manifest)? + "\n")
}

fn app_engine_manifest(config: &ServerConfig) -> String {
    format!(
        "runtime: {runtime}\nservice: {slug}\n",
        runtime = app_engine_runtime(config.language),
        slug = config.slug(),
    )
}

fn host_manifest() -> Result<String, DeployError> {
    let manifest = json!({
        "version": "2.0",
        "logging": {
            "applicationInsights": {
                "samplingSettings": {"isEnabled": true}
            }
        },
        "extensions": {
            "http": {"routePrefix": ""}
        },
    });
    Ok(serde_json::to_string_pretty(&manifest)? + "\n")
}

fn compose_manifest(config: &ServerConfig) -> String {
    let slug = config.slug();
    let port = default_port(config.language);
    let mut environment = vec![format!("      - PORT={port}")];
    if let Some(var) = config.authentication.secret_env_var() {
        environment.push(format!("      - {var}=${{{var}}}"));
    }
    format!(
        "services:\n  {slug}:\n    build: .\n    ports:\n      - \"{port}:{port}\"\n    environment:\n{env}\n",
        env = environment.join("\n"),
    )
}
