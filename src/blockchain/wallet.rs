//! Wallet management and account access.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//!
//! Two account sources exist. `node` asks the RPC node for the accounts it
//! manages (a development node or a wallet bridge), mirroring how a browser
//! wallet hands out accounts. `private_key` signs locally.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::schema::{WalletConfig, WalletSource};
use crate::error::{MintError, MintResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "MINT_CLIENT_PRIVATE_KEY";

/// Local signing wallet.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `MINT_CLIENT_PRIVATE_KEY` from environment.
    pub fn from_env() -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wrap the signer for use as a provider filler.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

/// Resolves the signer (if any) and the active account.
#[derive(Debug, Clone)]
pub struct WalletConnector {
    config: WalletConfig,
    wallet: Option<Wallet>,
}

impl WalletConnector {
    /// Prepare a connector. For the private-key source the key is loaded
    /// here, so a missing key fails before any network traffic.
    pub fn new(config: WalletConfig) -> MintResult<Self> {
        let wallet = match config.source {
            WalletSource::Node => None,
            WalletSource::PrivateKey => Some(
                Wallet::from_env().map_err(|e| MintError::WalletUnavailable(e.to_string()))?,
            ),
        };
        Ok(Self { config, wallet })
    }

    /// Connector around an already-loaded signer.
    pub fn with_wallet(wallet: Wallet) -> Self {
        Self {
            config: WalletConfig {
                source: WalletSource::PrivateKey,
                account_index: 0,
            },
            wallet: Some(wallet),
        }
    }

    /// Signer to install on the primary provider.
    pub fn signer(&self) -> Option<EthereumWallet> {
        self.wallet.as_ref().map(Wallet::ethereum_wallet)
    }

    /// Request account access and return the active account.
    pub async fn request_account(&self, client: &BlockchainClient) -> MintResult<Address> {
        if let Some(wallet) = &self.wallet {
            return Ok(wallet.address());
        }

        let accounts = client.get_accounts().await.map_err(|e| match e {
            BlockchainError::AccessDenied => MintError::UserDeniedAccess,
            other => MintError::WalletUnavailable(other.to_string()),
        })?;

        select_account(&accounts, self.config.account_index)
    }
}

fn select_account(accounts: &[Address], index: usize) -> MintResult<Address> {
    if accounts.is_empty() {
        return Err(MintError::WalletUnavailable("No account found".to_string()));
    }
    accounts.get(index).copied().ok_or_else(|| {
        MintError::WalletUnavailable(format!(
            "Account index {} out of range ({} accounts)",
            index,
            accounts.len()
        ))
    })
}
