//! Configuration schema definitions.
//!
//! Two documents drive the client:
//! - [`ClientConfig`]: local TOML settings (where to find the deployment,
//!   RPC tuning, wallet source, polling, metadata host, logging).
//! - [`DeploymentConfig`]: the JSON deployment document published next to the
//!   contracts (`params.json`), describing what is deployed and where.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for the mint client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Where the deployment and ABI documents live.
    pub deployment: DeploymentSourceConfig,

    /// RPC connection tuning.
    pub rpc: RpcConfig,

    /// Wallet selection.
    pub wallet: WalletConfig,

    /// State polling.
    pub polling: PollingConfig,

    /// Static metadata host.
    pub metadata: MetadataConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Locations of the runtime documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentSourceConfig {
    /// Deployment document, a file path or an http(s) URL.
    pub params: String,

    /// GameMint build artifact (`{ "abi": [...] }`), optional.
    pub mint_abi: Option<String>,

    /// GameNFT build artifact, optional.
    pub nft_abi: Option<String>,

    /// Reload the deployment document when the file changes.
    pub watch: bool,
}

impl Default for DeploymentSourceConfig {
    fn default() -> Self {
        Self {
            params: "params.json".to_string(),
            mint_abi: None,
            nft_abi: None,
            watch: false,
        }
    }
}

/// RPC connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Overrides the `rpcUrl` of the deployment document when set.
    pub url_override: Option<String>,

    /// Failover JSON-RPC endpoint URLs, tried in order for reads.
    pub failover_urls: Vec<String>,

    /// Expected chain ID. Checked on connect when set.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub timeout_secs: u64,

    /// Timeout waiting for a transaction receipt in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url_override: None,
            failover_urls: Vec::new(),
            chain_id: None,
            timeout_secs: 10,
            receipt_timeout_secs: 120,
        }
    }
}

/// Where the active account comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WalletSource {
    /// Accounts managed by the RPC node (`eth_accounts`).
    #[default]
    Node,
    /// Local signer, key read from the environment.
    PrivateKey,
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    pub source: WalletSource,

    /// Index into the node's account list.
    pub account_index: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            source: WalletSource::Node,
            account_index: 0,
        }
    }
}

/// Polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval between state refreshes in milliseconds.
    pub interval_ms: u64,

    /// Upper bound on the token id scan in ownership queries.
    pub max_token_scan: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            max_token_scan: 10_000,
        }
    }
}

/// Static metadata host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Base URL serving `/metadata/{id}.json` and `/metadata/{id}.png`.
    pub base_url: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Upper bound on metadata requests in flight when listing many tokens.
    pub max_concurrent_fetches: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
            max_concurrent_fetches: 16,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus exporter bind address, used by `watch`.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

/// The deployment document (`params.json`).
///
/// Older deployments wrote `isDeployed`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    #[serde(default, alias = "isDeployed")]
    pub deployed: bool,

    #[serde(default)]
    pub mint_contract_address: String,

    #[serde(default)]
    pub nft_contract_address: String,

    #[serde(default)]
    pub rpc_url: String,
}

/// A document location: local file or remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(Url),
}

impl DocumentSource {
    /// Interpret a configured location. Anything that parses as an http(s)
    /// URL is remote, everything else is a path.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => DocumentSource::Url(url),
            _ => DocumentSource::File(PathBuf::from(location)),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::File(path) => write!(f, "{}", path.display()),
            DocumentSource::Url(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_camel_case() {
        let json = r#"{
            "deployed": true,
            "mintContractAddress": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "nftContractAddress": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
            "rpcUrl": "http://localhost:8545"
        }"#;
        let config: DeploymentConfig = serde_json::from_str(json).unwrap();
        assert!(config.deployed);
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert!(config.mint_contract_address.starts_with("0x5FbDB"));
    }

    #[test]
    fn test_deployment_is_deployed_alias() {
        let config: DeploymentConfig =
            serde_json::from_str(r#"{ "isDeployed": true, "rpcUrl": "http://x" }"#).unwrap();
        assert!(config.deployed);
        assert!(config.mint_contract_address.is_empty());
    }

    #[test]
    fn test_deployment_missing_flag_defaults_false() {
        let config: DeploymentConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.deployed);
    }

    #[test]
    fn test_document_source_parse() {
        assert!(matches!(
            DocumentSource::parse("https://game.example/params.json"),
            DocumentSource::Url(_)
        ));
        assert_eq!(
            DocumentSource::parse("./public/params.json"),
            DocumentSource::File(PathBuf::from("./public/params.json"))
        );
    }

    #[test]
    fn test_client_config_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.deployment.params, "params.json");
        assert_eq!(config.wallet.source, WalletSource::Node);
        assert_eq!(config.polling.interval_ms, 5_000);
        assert_eq!(config.rpc.timeout_secs, 10);
    }

    #[test]
    fn test_client_config_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [deployment]
            params = "https://game.example/params.json"
            mint_abi = "abi/GameMint.json"

            [wallet]
            source = "private_key"

            [polling]
            interval_ms = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.wallet.source, WalletSource::PrivateKey);
        assert_eq!(config.polling.interval_ms, 1000);
        assert_eq!(config.deployment.mint_abi.as_deref(), Some("abi/GameMint.json"));
    }
}
