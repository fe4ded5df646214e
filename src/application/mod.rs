//! Application use cases wiring the import pipeline, generators, deploy
//! simulation, and record stores together.
//!
//! The transformation core stays free of persistence; these use cases are
//! the only code that touches the stores.

pub mod deploy_server;
pub mod errors;
pub mod generate_server;
pub mod import_definition;
pub mod output;

pub use deploy_server::{DeployServerRequest, DeployServerUseCase};
pub use errors::{ApplicationError, ValidationError};
pub use generate_server::{GenerateServerRequest, GenerateServerResponse, GenerateServerUseCase};
pub use import_definition::{
    ImportDefinitionRequest, ImportDefinitionResponse, ImportDefinitionUseCase,
};
pub use output::{FileSystemOutputService, OutputService};
