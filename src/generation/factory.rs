//! Generator selection.
//!
//! One dispatch table owns the language/mode support matrix; lookup,
//! capability queries, and error reporting all read from it.

use crate::generation::errors::GenerationError;
use crate::generation::golang::GoGenerator;
use crate::generation::python::PythonGenerator;
use crate::generation::types::ServerGenerator;
use crate::generation::typescript::TypeScriptGenerator;
use crate::model::config::{GenerationMode, TargetLanguage};

type Constructor = fn(GenerationMode) -> Box<dyn ServerGenerator>;

fn typescript(mode: GenerationMode) -> Box<dyn ServerGenerator> {
    Box::new(TypeScriptGenerator::new(mode))
}

fn python(mode: GenerationMode) -> Box<dyn ServerGenerator> {
    Box::new(PythonGenerator::new(mode))
}

fn golang(mode: GenerationMode) -> Box<dyn ServerGenerator> {
    Box::new(GoGenerator::new(mode))
}

/// Every supported language/mode pairing. Go has no proxy generator.
const DISPATCH: &[(TargetLanguage, GenerationMode, Constructor)] = &[
    (TargetLanguage::TypeScript, GenerationMode::Direct, typescript),
    (TargetLanguage::TypeScript, GenerationMode::Proxy, typescript),
    (TargetLanguage::Python, GenerationMode::Direct, python),
    (TargetLanguage::Python, GenerationMode::Proxy, python),
    (TargetLanguage::Go, GenerationMode::Direct, golang),
];

pub fn create_generator(
    language: TargetLanguage,
    mode: GenerationMode,
) -> Result<Box<dyn ServerGenerator>, GenerationError> {
    DISPATCH
        .iter()
        .find(|(l, m, _)| *l == language && *m == mode)
        .map(|(_, _, construct)| construct(mode))
        .ok_or(GenerationError::UnsupportedLanguage { language, mode })
}

pub fn supported_languages(mode: GenerationMode) -> Vec<TargetLanguage> {
    DISPATCH
        .iter()
        .filter(|(_, m, _)| *m == mode)
        .map(|(l, _, _)| *l)
        .collect()
}

pub fn is_language_supported(language: TargetLanguage, mode: GenerationMode) -> bool {
    DISPATCH
        .iter()
        .any(|(l, m, _)| *l == language && *m == mode)
}
