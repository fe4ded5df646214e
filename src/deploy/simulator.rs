//! Simulated deploy call.
//!
//! No network traffic leaves this module: the deploy "runs" for a fixed
//! artificial delay and returns the URL the server would live at on its
//! hosting target.

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;
use url::Url;

use crate::deploy::DeployError;
use crate::generation::types::ServerFile;
use crate::model::config::{HostingProvider, ServerConfig};

/// Fixed artificial latency for every simulated deploy.
pub const DEPLOY_DELAY: Duration = Duration::from_millis(1500);

/// Runs the simulated deploy for a packaged file set.
pub async fn simulate_deploy(
    config: &ServerConfig,
    files: &[ServerFile],
) -> Result<Url, DeployError> {
    if files.is_empty() {
        return Err(DeployError::EmptyBundle);
    }

    sleep(DEPLOY_DELAY).await;

    let url = deployment_url(config)?;
    info!(url = %url, files = files.len(), "simulated deploy complete");
    Ok(url)
}

/// The URL a deployed server would answer at, derived from the slug and
/// hosting provider.
pub fn deployment_url(config: &ServerConfig) -> Result<Url, DeployError> {
    let slug = config.slug();
    let host = match config.hosting.provider {
        HostingProvider::Aws => {
            let region = config.hosting.region.as_deref().unwrap_or("us-east-1");
            format!("{slug}.execute-api.{region}.amazonaws.com")
        }
        HostingProvider::Gcp => format!("{slug}.appspot.com"),
        HostingProvider::Azure => format!("{slug}.azurewebsites.net"),
        HostingProvider::SelfHosted => format!("{slug}.internal.example.com"),
    };
    Ok(Url::parse(&format!("https://{host}/"))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::TargetLanguage;

    fn config_for(provider: HostingProvider) -> ServerConfig {
        let mut config = ServerConfig::new("Widget API", TargetLanguage::TypeScript);
        config.hosting.provider = provider;
        config
    }

    #[test]
    fn test_deployment_url_per_provider() {
        let cases = [
            (
                HostingProvider::Aws,
                "https://widget-api.execute-api.us-east-1.amazonaws.com/",
            ),
            (HostingProvider::Gcp, "https://widget-api.appspot.com/"),
            (
                HostingProvider::Azure,
                "https://widget-api.azurewebsites.net/",
            ),
            (
                HostingProvider::SelfHosted,
                "https://widget-api.internal.example.com/",
            ),
        ];
        for (provider, expected) in cases {
            let url = deployment_url(&config_for(provider)).unwrap();
            assert_eq!(url.as_str(), expected, "{provider:?}");
        }
    }

    #[test]
    fn test_deployment_url_uses_configured_region() {
        let mut config = config_for(HostingProvider::Aws);
        config.hosting.region = Some("ap-southeast-2".to_string());
        let url = deployment_url(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "https://widget-api.execute-api.ap-southeast-2.amazonaws.com/"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_deploy_returns_url_after_delay() {
        let config = config_for(HostingProvider::Gcp);
        let files = vec![ServerFile::config("", "app.yaml", "runtime: nodejs20\n")];
        let url = simulate_deploy(&config, &files).await.unwrap();
        assert_eq!(url.host_str(), Some("widget-api.appspot.com"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_deploy_rejects_empty_bundle() {
        let config = config_for(HostingProvider::Gcp);
        let err = simulate_deploy(&config, &[]).await.unwrap_err();
        assert!(matches!(err, DeployError::EmptyBundle));
    }
}
