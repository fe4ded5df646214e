//! Deployment packaging and the simulated deploy call.

pub mod packager;
pub mod simulator;

use thiserror::Error;

pub use packager::{manifest, package};
pub use simulator::{deployment_url, simulate_deploy, DEPLOY_DELAY};

#[derive(Error, Debug)]
pub enum DeployError {
    /// Deploy was asked to ship an empty file set.
    #[error("nothing to deploy: generation produced no files")]
    EmptyBundle,

    #[error("manifest serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("deployment URL is not valid: {0}")]
    Url(#[from] url::ParseError),
}
