//! Definition ingestion: loading, sniffing, parsing, classification,
//! validation, and endpoint extraction.

pub mod classifier;
pub mod extractor;
pub mod loader;
pub mod parser;
pub mod sniffer;
pub mod validator;

pub use classifier::{ApiFormat, Classification, ClassificationBasis, classify};
pub use extractor::extract;
pub use loader::{
    CompositeDefinitionLoader, DefinitionLoader, FileDefinitionLoader, HttpDefinitionLoader,
    LoadedDefinition,
};
pub use parser::{ParsedDocument, parse};
pub use sniffer::{DetectedFormat, RawContent, detect};
pub use validator::validate;
