//! MCP server code generation.
//!
//! [`generate_server_code`] is the single entry point: it validates the
//! config, dispatches to the language generator, and normalizes every
//! failure into [`GenerationResult`] so callers never see a raw error.

pub mod conformance;
pub mod errors;
pub mod factory;
pub mod golang;
pub mod python;
pub mod scaffold;
pub mod typescript;
pub mod types;

use tracing::{debug, warn};

pub use errors::GenerationError;
pub use factory::{create_generator, is_language_supported, supported_languages};
pub use types::{FileType, GenerationResult, ServerFile, ServerGenerator};

use crate::model::config::ServerConfig;

/// Generates the full server file set for `config`. Never returns an
/// error: config problems, unsupported language/mode pairings, and
/// generator failures all come back as `success == false`.
pub fn generate_server_code(config: &ServerConfig) -> GenerationResult {
    debug!(
        name = %config.name,
        language = %config.language,
        mode = %config.mode,
        endpoints = config.endpoints.len(),
        "generating server code"
    );

    let problems = config.validate();
    if !problems.is_empty() {
        warn!(problems = problems.len(), "config failed validation");
        return GenerationResult::failed(problems.join("; "));
    }

    let generator = match factory::create_generator(config.language, config.mode) {
        Ok(generator) => generator,
        Err(err) => return GenerationResult::failed(err.to_string()),
    };

    match generator.generate(config) {
        Ok(files) => {
            debug!(files = files.len(), "generation complete");
            GenerationResult::succeeded(files)
        }
        Err(err) => {
            warn!(error = %err, "generation failed");
            GenerationResult::failed(err.to_string())
        }
    }
}
