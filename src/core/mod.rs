//! Shared foundations: the crate error type and string utilities.

pub mod error;
pub mod utils;

pub use error::{Error, Result};
