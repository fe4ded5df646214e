//! Template rendering: the `{{ dotted.path }}` engine and the named
//! registry the generators pull file shells from.

pub mod engine;
pub mod registry;

pub use engine::render;
pub use registry::{TemplateError, TemplateRegistry};
