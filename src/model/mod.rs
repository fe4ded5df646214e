//! Domain model: normalized endpoints, the in-memory editor, and the
//! per-request server configuration.

pub mod config;
pub mod editor;
pub mod endpoint;

pub use config::{
    AuthConfig, AuthLocation, AuthScheme, GenerationMode, HostingConfig, HostingKind,
    HostingProvider, SecretValue, ServerConfig, TargetLanguage,
};
pub use editor::{EditError, EndpointDraft, EndpointEditor, EndpointFilter, EndpointPatch};
pub use endpoint::{Endpoint, HttpMethod, McpRole, ParamType, Parameter, ResponseSpec};
