//! Post-generation structural check.
//!
//! Generators can evolve independently of the layout each language
//! promises, so after generation the emitted file set is compared
//! against the required layout for the configured language. Reported
//! paths are relative to the server root.

use crate::generation::types::ServerFile;
use crate::model::config::{ServerConfig, TargetLanguage};

/// Paths every generated server must contain for a language, before
/// auth is taken into account.
pub fn required_files(language: TargetLanguage) -> &'static [&'static str] {
    match language {
        TargetLanguage::TypeScript => &[
            "package.json",
            "tsconfig.json",
            "src/index.ts",
            "src/routes/resourceRoutes.ts",
            "src/routes/toolRoutes.ts",
        ],
        TargetLanguage::Python => &[
            "main.py",
            "requirements.txt",
            "routes/resources.py",
            "routes/tools.py",
        ],
        TargetLanguage::Go => &["go.mod", "main.go", "handlers.go"],
    }
}

/// The auth middleware path, required only when authentication is on.
fn auth_path(language: TargetLanguage) -> Option<&'static str> {
    match language {
        TargetLanguage::TypeScript => Some("src/middleware/authMiddleware.ts"),
        TargetLanguage::Python => Some("middleware/auth.py"),
        TargetLanguage::Go => None,
    }
}

/// Returns the required paths missing from `files`, empty when the set
/// conforms.
pub fn verify_layout(config: &ServerConfig, files: &[ServerFile]) -> Vec<String> {
    let emitted: Vec<String> = files
        .iter()
        .map(|f| f.full_path().to_string_lossy().into_owned())
        .collect();

    let mut required: Vec<&str> = required_files(config.language).to_vec();
    if config.authentication.is_enabled()
        && let Some(path) = auth_path(config.language)
    {
        required.push(path);
    }

    required
        .into_iter()
        .filter(|path| !emitted.iter().any(|e| e == path))
        .map(str::to_string)
        .collect()
}
