//! Named template registry.
//!
//! Generators look templates up by `<language>/<file>` name. Each template
//! is registered together with the context keys it is allowed to
//! reference, so a placeholder the generator never fills is caught at
//! registration instead of leaking `{{ ... }}` into generated code.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::templates::engine;

/// Template lookup and registration failures. A missing template is a
/// programmer error (generator asked for a name nothing registered), not a
/// user-recoverable condition.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("template {template} references undeclared context keys: {keys:?}")]
    UndeclaredKeys { template: String, keys: Vec<String> },
}

struct RegisteredTemplate {
    source: String,
    declared_keys: Vec<String>,
}

/// Registry of named templates with declared context-key manifests.
#[derive(Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, RegisteredTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template under a name, checking every placeholder in the
    /// source against the declared keys. A placeholder `a.b.c` is covered
    /// by a declared key `a`, `a.b`, or `a.b.c`.
    pub fn register(
        &mut self,
        name: &str,
        source: &str,
        declared_keys: &[&str],
    ) -> Result<(), TemplateError> {
        let undeclared: Vec<String> = engine::placeholders(source)
            .into_iter()
            .filter(|placeholder| {
                !declared_keys.iter().any(|key| {
                    placeholder == key || placeholder.starts_with(&format!("{key}."))
                })
            })
            .collect();
        if !undeclared.is_empty() {
            return Err(TemplateError::UndeclaredKeys {
                template: name.to_string(),
                keys: undeclared,
            });
        }

        self.templates.insert(
            name.to_string(),
            RegisteredTemplate {
                source: source.to_string(),
                declared_keys: declared_keys.iter().map(|k| k.to_string()).collect(),
            },
        );
        Ok(())
    }

    /// Renders a registered template. Unresolved placeholders stay verbatim
    /// per the engine's miss policy.
    pub fn render(&self, name: &str, context: &JsonValue) -> Result<String, TemplateError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        Ok(engine::render(&template.source, context))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn declared_keys(&self, name: &str) -> Option<&[String]> {
        self.templates
            .get(name)
            .map(|t| t.declared_keys.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The full built-in template set, embedded at compile time.
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut registry = Self::new();

        registry.register(
            "typescript/package.json",
            include_str!("../../templates/typescript/package.json.tpl"),
            &["server"],
        )?;
        registry.register(
            "typescript/tsconfig.json",
            include_str!("../../templates/typescript/tsconfig.json.tpl"),
            &[],
        )?;
        registry.register(
            "typescript/index.ts",
            include_str!("../../templates/typescript/index.ts.tpl"),
            &["server", "auth", "capabilities"],
        )?;
        registry.register(
            "typescript/resource_routes.ts",
            include_str!("../../templates/typescript/resource_routes.ts.tpl"),
            &["routes"],
        )?;
        registry.register(
            "typescript/tool_routes.ts",
            include_str!("../../templates/typescript/tool_routes.ts.tpl"),
            &["routes"],
        )?;
        registry.register(
            "typescript/auth_middleware.ts",
            include_str!("../../templates/typescript/auth_middleware.ts.tpl"),
            &["auth"],
        )?;

        registry.register(
            "python/main.py",
            include_str!("../../templates/python/main.py.tpl"),
            &["server", "auth", "capabilities"],
        )?;
        registry.register(
            "python/requirements.txt",
            include_str!("../../templates/python/requirements.txt.tpl"),
            &["deps"],
        )?;
        registry.register(
            "python/resources_routes.py",
            include_str!("../../templates/python/resources_routes.py.tpl"),
            &["routes"],
        )?;
        registry.register(
            "python/tools_routes.py",
            include_str!("../../templates/python/tools_routes.py.tpl"),
            &["routes"],
        )?;
        registry.register(
            "python/auth_middleware.py",
            include_str!("../../templates/python/auth_middleware.py.tpl"),
            &["auth"],
        )?;

        registry.register(
            "go/go.mod",
            include_str!("../../templates/go/go.mod.tpl"),
            &["server"],
        )?;
        registry.register(
            "go/main.go",
            include_str!("../../templates/go/main.go.tpl"),
            &["server", "auth", "capabilities"],
        )?;
        registry.register(
            "go/handlers.go",
            include_str!("../../templates/go/handlers.go.tpl"),
            &["routes"],
        )?;
        registry.register(
            "go/dockerfile",
            include_str!("../../templates/go/dockerfile.tpl"),
            &[],
        )?;

        registry.register(
            "common/readme.md",
            include_str!("../../templates/common/readme.md.tpl"),
            &["server", "auth", "endpoints", "run"],
        )?;
        registry.register(
            "common/env_example",
            include_str!("../../templates/common/env_example.tpl"),
            &["server", "env"],
        )?;

        Ok(registry)
    }
}
