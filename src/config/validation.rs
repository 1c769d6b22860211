//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that a deployed document names parseable contract addresses
//! - Validate value ranges (timeouts > 0, intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the parsed documents
//! - Runs before a document is accepted into a session

use std::fmt;

use alloy::primitives::Address;
use url::Url;

use crate::config::schema::{ClientConfig, DeploymentConfig};

/// A single semantic problem in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the local client settings.
pub fn validate_client_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.deployment.params.trim().is_empty() {
        errors.push(ValidationError::new("deployment.params", "must not be empty"));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than zero"));
    }
    if config.rpc.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "rpc.receipt_timeout_secs",
            "must be greater than zero",
        ));
    }
    if let Some(url) = &config.rpc.url_override {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::new("rpc.url_override", format!("invalid URL '{}'", url)));
        }
    }
    for url in &config.rpc.failover_urls {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::new("rpc.failover_urls", format!("invalid URL '{}'", url)));
        }
    }
    if config.polling.interval_ms == 0 {
        errors.push(ValidationError::new("polling.interval_ms", "must be greater than zero"));
    }
    if Url::parse(&config.metadata.base_url).is_err() {
        errors.push(ValidationError::new(
            "metadata.base_url",
            format!("invalid URL '{}'", config.metadata.base_url),
        ));
    }
    if config.metadata.max_concurrent_fetches == 0 {
        errors.push(ValidationError::new(
            "metadata.max_concurrent_fetches",
            "must be greater than zero",
        ));
    }
    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!("invalid socket address '{}'", addr),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a deployment document.
///
/// An undeployed document is always valid: it only tells the client that
/// there is nothing to talk to yet. `rpc_url_required` is false when the
/// client settings override the RPC URL.
pub fn validate_deployment(
    config: &DeploymentConfig,
    rpc_url_required: bool,
) -> Result<(), Vec<ValidationError>> {
    if !config.deployed {
        return Ok(());
    }

    let mut errors = Vec::new();

    if config.mint_contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "mintContractAddress",
            format!("invalid address '{}'", config.mint_contract_address),
        ));
    }
    if config.nft_contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "nftContractAddress",
            format!("invalid address '{}'", config.nft_contract_address),
        ));
    }
    if rpc_url_required && Url::parse(&config.rpc_url).is_err() {
        errors.push(ValidationError::new(
            "rpcUrl",
            format!("invalid URL '{}'", config.rpc_url),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployed() -> DeploymentConfig {
        DeploymentConfig {
            deployed: true,
            mint_contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            nft_contract_address: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
        }
    }

    #[test]
    fn test_zero_fetch_concurrency_rejected() {
        let mut config = ClientConfig::default();
        config.deployment.params = "params.json".to_string();
        config.metadata.max_concurrent_fetches = 0;

        let errors = validate_client_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "metadata.max_concurrent_fetches");
    }

    #[test]
    fn test_valid_deployment() {
        assert!(validate_deployment(&deployed(), true).is_ok());
    }

    #[test]
    fn test_undeployed_skips_checks() {
        let config = DeploymentConfig::default();
        assert!(validate_deployment(&config, true).is_ok());
    }

    #[test]
    fn test_reports_every_bad_field() {
        let mut config = deployed();
        config.mint_contract_address = "0x123".to_string();
        config.nft_contract_address = String::new();
        config.rpc_url = "not a url".to_string();

        let errors = validate_deployment(&config, true).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "mintContractAddress");
    }

    #[test]
    fn test_rpc_url_not_required_with_override() {
        let mut config = deployed();
        config.rpc_url = String::new();
        assert!(validate_deployment(&config, false).is_ok());
    }

    #[test]
    fn test_client_config_ranges() {
        let mut config = ClientConfig::default();
        assert!(validate_client_config(&config).is_ok());

        config.rpc.timeout_secs = 0;
        config.polling.interval_ms = 0;
        config.observability.metrics_address = Some("nowhere".to_string());
        let errors = validate_client_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[2].to_string().contains("observability.metrics_address"));
    }
}
