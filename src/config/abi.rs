//! ABI document checks.
//!
//! The contract bindings are compiled in, so the ABI documents are not needed
//! to talk to the contracts. When they are configured they are used to confirm
//! that the deployed interface matches what the client calls, and to pick the
//! id counter name, which changed between contract revisions.

use alloy::json_abi::JsonAbi;
use serde::Deserialize;

use crate::blockchain::contracts::IdCounter;
use crate::config::loader::{fetch_document, ConfigError};
use crate::config::schema::{DeploymentSourceConfig, DocumentSource};

const MINT_FUNCTIONS: &[&str] = &[
    "userCommit",
    "userMint",
    "nftPrice",
    "isSetup",
    "revealBlock",
    "adminSecret",
];
const MINT_EVENTS: &[&str] = &["UserCommit", "UserMint"];
const NFT_FUNCTIONS: &[&str] = &["balanceOfBatch"];

/// Either a build artifact with an `abi` field or a bare ABI array.
#[derive(Deserialize)]
#[serde(untagged)]
enum AbiDocument {
    Bare(JsonAbi),
    Artifact { abi: JsonAbi },
}

/// Interface details resolved from the ABI documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContractInterfaces {
    pub id_counter: IdCounter,
}

/// Parse an ABI document body.
pub fn parse_abi(body: &str) -> Result<JsonAbi, ConfigError> {
    let doc: AbiDocument = serde_json::from_str(body).map_err(ConfigError::Json)?;
    Ok(match doc {
        AbiDocument::Bare(abi) => abi,
        AbiDocument::Artifact { abi } => abi,
    })
}

fn missing(abi: &JsonAbi, functions: &[&str], events: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = functions
        .iter()
        .filter(|name| !abi.functions.contains_key(**name))
        .map(|name| format!("function {}", name))
        .collect();
    out.extend(
        events
            .iter()
            .filter(|name| !abi.events.contains_key(**name))
            .map(|name| format!("event {}", name)),
    );
    out
}

/// Check the GameMint ABI and resolve the id counter name.
pub fn check_mint_abi(abi: &JsonAbi) -> Result<IdCounter, ConfigError> {
    let mut absent = missing(abi, MINT_FUNCTIONS, MINT_EVENTS);

    let id_counter = if abi.functions.contains_key(IdCounter::Lower.method_name()) {
        Some(IdCounter::Lower)
    } else if abi.functions.contains_key(IdCounter::Upper.method_name()) {
        Some(IdCounter::Upper)
    } else {
        absent.push("function id_count".to_string());
        None
    };

    match id_counter {
        Some(counter) if absent.is_empty() => Ok(counter),
        _ => Err(ConfigError::Abi(format!("GameMint is missing {}", absent.join(", ")))),
    }
}

/// Check the GameNFT ABI.
pub fn check_nft_abi(abi: &JsonAbi) -> Result<(), ConfigError> {
    let absent = missing(abi, NFT_FUNCTIONS, &[]);
    if absent.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Abi(format!("GameNFT is missing {}", absent.join(", "))))
    }
}

/// Load whichever ABI documents are configured and check them.
pub async fn load_interfaces(
    sources: &DeploymentSourceConfig,
    http: &reqwest::Client,
) -> Result<ContractInterfaces, ConfigError> {
    let mut interfaces = ContractInterfaces::default();

    if let Some(location) = &sources.mint_abi {
        let body = fetch_document(&DocumentSource::parse(location), http).await?;
        interfaces.id_counter = check_mint_abi(&parse_abi(&body)?)?;
        tracing::debug!(id_counter = interfaces.id_counter.method_name(), "GameMint ABI checked");
    }
    if let Some(location) = &sources.nft_abi {
        let body = fetch_document(&DocumentSource::parse(location), http).await?;
        check_nft_abi(&parse_abi(&body)?)?;
        tracing::debug!("GameNFT ABI checked");
    }

    Ok(interfaces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, mutability: &str) -> String {
        format!(
            r#"{{"type":"function","name":"{}","inputs":[],"outputs":[],"stateMutability":"{}"}}"#,
            name, mutability
        )
    }

    fn event(name: &str, field: &str) -> String {
        format!(
            r#"{{"type":"event","name":"{}","anonymous":false,"inputs":[
                {{"name":"user","type":"address","indexed":true}},
                {{"name":"{}","type":"uint256","indexed":false}}]}}"#,
            name, field
        )
    }

    fn mint_abi_with_events(counter: &str, events: &[(&str, &str)]) -> String {
        let mut items: Vec<String> = MINT_FUNCTIONS.iter().map(|n| function(n, "view")).collect();
        items.push(function(counter, "view"));
        items.extend(events.iter().map(|(name, field)| event(name, field)));
        format!(r#"{{"contractName":"GameMint","abi":[{}]}}"#, items.join(","))
    }

    fn mint_abi(counter: &str) -> String {
        mint_abi_with_events(counter, &[("UserCommit", "tokenId"), ("UserMint", "nftId")])
    }

    #[test]
    fn test_artifact_resolves_lower_counter() {
        let abi = parse_abi(&mint_abi("id_count")).unwrap();
        assert_eq!(check_mint_abi(&abi).unwrap(), IdCounter::Lower);
    }

    #[test]
    fn test_artifact_resolves_upper_counter() {
        let abi = parse_abi(&mint_abi("ID_COUNT")).unwrap();
        assert_eq!(check_mint_abi(&abi).unwrap(), IdCounter::Upper);
    }

    #[test]
    fn test_missing_counter_is_reported() {
        let abi = parse_abi(&mint_abi("tokenCount")).unwrap();
        let err = check_mint_abi(&abi).unwrap_err();
        assert!(err.to_string().contains("id_count"));
    }

    #[test]
    fn test_missing_mint_event_is_reported() {
        let body = mint_abi_with_events("id_count", &[("UserCommit", "tokenId")]);
        let abi = parse_abi(&body).unwrap();
        let err = check_mint_abi(&abi).unwrap_err();
        assert!(err.to_string().contains("event UserMint"));
    }

    #[test]
    fn test_bare_nft_abi() {
        let body = format!("[{}]", function("balanceOfBatch", "view"));
        let abi = parse_abi(&body).unwrap();
        assert!(check_nft_abi(&abi).is_ok());

        let empty = parse_abi("[]").unwrap();
        let err = check_nft_abi(&empty).unwrap_err();
        assert!(err.to_string().contains("balanceOfBatch"));
    }
}
