//! Server configuration handed to the generators.
//!
//! A [`ServerConfig`] is assembled fresh for every generation request from
//! the edited endpoint list plus the user's language, auth, and hosting
//! choices. Nothing here touches the filesystem or network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;
use zeroize::Zeroize;

use crate::model::endpoint::Endpoint;

/// Languages a server can be generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    TypeScript,
    Python,
    Go,
}

impl TargetLanguage {
    pub fn all() -> &'static [TargetLanguage] {
        &[
            TargetLanguage::TypeScript,
            TargetLanguage::Python,
            TargetLanguage::Go,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => "typescript",
            TargetLanguage::Python => "python",
            TargetLanguage::Go => "go",
        }
    }

    /// Human-facing name used in generated READMEs.
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => "TypeScript",
            TargetLanguage::Python => "Python",
            TargetLanguage::Go => "Go",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(TargetLanguage::TypeScript),
            "python" | "py" => Ok(TargetLanguage::Python),
            "go" | "golang" => Ok(TargetLanguage::Go),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// How the generated server fulfils requests.
///
/// `Direct` servers answer with stub data locally; `Proxy` servers forward
/// each request to the upstream API the definition describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Direct,
    Proxy,
}

impl GenerationMode {
    pub fn all() -> &'static [GenerationMode] {
        &[GenerationMode::Direct, GenerationMode::Proxy]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Direct => "direct",
            GenerationMode::Proxy => "proxy",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(GenerationMode::Direct),
            "proxy" => Ok(GenerationMode::Proxy),
            other => Err(format!("unknown generation mode: {other}")),
        }
    }
}

/// A secret that clears its memory on drop and never appears in Debug
/// output. Serialization is transparent so configs stay plain JSON.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Deliberate accessor so reads of the raw secret are greppable.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Zeroize for SecretValue {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for SecretValue {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Authentication schemes the generated middleware can enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    None,
    ApiKey,
    Basic,
    Bearer,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::None => "none",
            AuthScheme::ApiKey => "apikey",
            AuthScheme::Basic => "basic",
            AuthScheme::Bearer => "bearer",
        }
    }

    /// Label used in generated documentation.
    pub fn display_name(&self) -> &'static str {
        match self {
            AuthScheme::None => "None",
            AuthScheme::ApiKey => "API Key",
            AuthScheme::Basic => "Basic",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

/// Where an API key is expected on incoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthLocation {
    #[default]
    Header,
    Query,
}

/// Authentication settings for the generated server.
///
/// The generated middleware always compares against an environment variable
/// at request time; `value` exists only so deployment tooling can seed that
/// variable, and it never lands in generated source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(rename = "type", default)]
    pub scheme: AuthScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<AuthLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SecretValue>,
}

impl AuthConfig {
    pub fn is_enabled(&self) -> bool {
        self.scheme != AuthScheme::None
    }

    pub fn location(&self) -> AuthLocation {
        self.location.unwrap_or_default()
    }

    /// The header or query-parameter name carrying the credential.
    pub fn key_name(&self) -> String {
        if let Some(name) = &self.name
            && !name.is_empty()
        {
            return name.clone();
        }
        match (self.scheme, self.location()) {
            (AuthScheme::ApiKey, AuthLocation::Header) => "X-API-Key".to_string(),
            (AuthScheme::ApiKey, AuthLocation::Query) => "api_key".to_string(),
            _ => "Authorization".to_string(),
        }
    }

    /// Environment variable the generated server reads the expected secret
    /// from. `None` when auth is disabled.
    pub fn secret_env_var(&self) -> Option<&'static str> {
        match self.scheme {
            AuthScheme::None => None,
            AuthScheme::ApiKey => Some("API_KEY"),
            AuthScheme::Bearer => Some("BEARER_TOKEN"),
            AuthScheme::Basic => Some("BASIC_AUTH_CREDENTIALS"),
        }
    }
}

/// Hosting targets the deployment packager knows manifests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostingProvider {
    Aws,
    Gcp,
    Azure,
    #[default]
    #[serde(rename = "selfhosted")]
    SelfHosted,
}

impl HostingProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostingProvider::Aws => "aws",
            HostingProvider::Gcp => "gcp",
            HostingProvider::Azure => "azure",
            HostingProvider::SelfHosted => "selfhosted",
        }
    }
}

impl fmt::Display for HostingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment shapes within a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostingKind {
    Serverless,
    #[default]
    Container,
    Vm,
}

impl HostingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostingKind::Serverless => "serverless",
            HostingKind::Container => "container",
            HostingKind::Vm => "vm",
        }
    }
}

/// Hosting selection for the deployment packager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HostingConfig {
    #[serde(default)]
    pub provider: HostingProvider,
    #[serde(rename = "type", default)]
    pub kind: HostingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Upstream base URL baked into proxy-mode servers as the default for
    /// their `UPSTREAM_BASE_URL` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_base_url: Option<Url>,
}

/// Everything a generator needs to synthesize a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub language: TargetLanguage,
    #[serde(default)]
    pub mode: GenerationMode,
    #[serde(default)]
    pub authentication: AuthConfig,
    #[serde(default)]
    pub hosting: HostingConfig,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, language: TargetLanguage) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            language,
            mode: GenerationMode::Direct,
            authentication: AuthConfig::default(),
            hosting: HostingConfig::default(),
            endpoints: Vec::new(),
        }
    }

    /// Structural checks a config must pass before generation. Collects
    /// every problem rather than stopping at the first.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("server name must not be empty".to_string());
        }
        if self.authentication.scheme == AuthScheme::ApiKey
            && self.authentication.name.as_deref() == Some("")
        {
            problems.push("api key name must not be empty when set".to_string());
        }
        for endpoint in &self.endpoints {
            if endpoint.path.trim().is_empty() {
                problems.push(format!("endpoint {} has an empty path", endpoint.id));
            }
        }
        problems
    }

    /// Identifier-safe form of the server name used in manifests.
    pub fn slug(&self) -> String {
        let slug: String = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let trimmed = slug.trim_matches('-');
        if trimmed.is_empty() {
            "mcp-server".to_string()
        } else {
            trimmed.to_string()
        }
    }
}
