//! mcpforge turns API definitions (OpenAPI 2.0/3.x, RAML, API Blueprint)
//! into ready-to-run MCP server source trees for TypeScript, Python, and Go.
//!
//! The library is layered: [`ingest`] takes raw definition text to a
//! normalized endpoint list, [`model`] holds the endpoint and configuration
//! types plus interactive editing, [`templates`] and [`generation`] turn a
//! configuration into target-language source files, [`deploy`] simulates
//! shipping them, [`store`] persists the records, and [`application`] wires
//! those pieces into use cases. The transformation core is synchronous and
//! pure; async appears only at the loader, store, and deploy boundaries.

#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod deploy;
pub mod generation;
pub mod ingest;
pub mod model;
pub mod store;
pub mod templates;
