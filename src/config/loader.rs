//! Configuration loading from disk or over HTTP.

use std::fs;
use std::path::Path;

use crate::config::schema::{ClientConfig, DeploymentConfig, DocumentSource};
use crate::config::validation::{validate_client_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Validation(Vec<ValidationError>),
    Abi(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Http(e) => write!(f, "HTTP error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Abi(msg) => write!(f, "ABI error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate client settings from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ClientConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_client_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read a document body from a file or URL.
pub async fn fetch_document(
    source: &DocumentSource,
    http: &reqwest::Client,
) -> Result<String, ConfigError> {
    match source {
        DocumentSource::File(path) => tokio::fs::read_to_string(path).await.map_err(ConfigError::Io),
        DocumentSource::Url(url) => {
            let res = http
                .get(url.clone())
                .send()
                .await
                .and_then(|res| res.error_for_status())
                .map_err(ConfigError::Http)?;
            res.text().await.map_err(ConfigError::Http)
        }
    }
}

/// Parse a deployment document. Validation happens when a session adopts it,
/// since whether `rpcUrl` is required depends on the client settings.
pub fn parse_deployment(body: &str) -> Result<DeploymentConfig, ConfigError> {
    serde_json::from_str(body).map_err(ConfigError::Json)
}

/// Fetch and parse the deployment document.
pub async fn load_deployment(
    source: &DocumentSource,
    http: &reqwest::Client,
) -> Result<DeploymentConfig, ConfigError> {
    let body = fetch_document(source, http).await?;
    let deployment = parse_deployment(&body)?;

    tracing::debug!(
        source = %source,
        deployed = deployment.deployed,
        mint = %deployment.mint_contract_address,
        nft = %deployment.nft_contract_address,
        "Deployment document loaded"
    );
    Ok(deployment)
}
