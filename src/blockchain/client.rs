//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint named by the deployment document
//! - Query chain state (block number, contract calls, logs, accounts)
//! - Estimate gas and submit transactions through the primary provider
//! - Handle timeouts and network errors, failing over for reads

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, RpcConfig};
use crate::observability::metrics;

/// JSON-RPC error code for a user rejecting a wallet request (EIP-1193).
const USER_REJECTED_CODE: i64 = 4001;

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers). Only the primary signs.
    providers: Vec<SharedProvider>,
    /// Primary RPC URL, for diagnostics.
    rpc_url: String,
    /// Configuration.
    config: RpcConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// # Arguments
    /// * `rpc_url` - Primary JSON-RPC endpoint
    /// * `config` - RPC tuning (timeouts, failovers, expected chain)
    /// * `wallet` - Local signer for the primary provider, if any
    pub async fn new(
        rpc_url: &str,
        config: RpcConfig,
        wallet: Option<EthereumWallet>,
    ) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;
        let primary: SharedProvider = match wallet {
            Some(wallet) => Arc::new(ProviderBuilder::new().wallet(wallet).connect_http(primary_url)),
            None => Arc::new(ProviderBuilder::new().connect_http(primary_url)),
        };
        providers.push(primary);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            rpc_url: rpc_url.to_string(),
            config,
            timeout_duration,
        };

        if let Some(expected) = client.config.chain_id {
            match client.verify_chain_id(expected).await {
                Ok(()) => tracing::info!(rpc_url = %rpc_url, chain_id = expected, "Blockchain client initialized"),
                Err(e) => tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                ),
            }
        } else {
            tracing::info!(rpc_url = %rpc_url, "Blockchain client initialized");
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Run a read against each provider in turn until one answers.
    async fn read<T, F, Fut>(&self, op: &'static str, f: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = String::from("no providers");
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, f(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    metrics::record_rpc_error(op);
                    tracing::warn!(provider_idx = i, op, error = %e, "RPC error, trying next provider");
                    last_error = e.to_string();
                }
                Err(_) => {
                    metrics::record_rpc_error(op);
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                    last_error = format!("timeout after {}s", self.config.timeout_secs);
                }
            }
        }
        Err(BlockchainError::Rpc(format!(
            "All RPC providers failed for {}: {}",
            op, last_error
        )))
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.read("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.read("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// Execute a read-only contract call and return the raw return data.
    pub async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.read("eth_call", |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }

    /// Fetch logs matching a filter.
    pub async fn get_logs(&self, filter: &Filter) -> BlockchainResult<Vec<Log>> {
        self.read("eth_getLogs", |p| {
            let filter = filter.clone();
            async move { p.get_logs(&filter).await }
        })
        .await
    }

    /// Estimate gas on the primary provider.
    ///
    /// Estimation simulates the call from the sender, so a failover node with
    /// different state could give a misleading answer.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        let provider = self.provider();
        match timeout(self.timeout_duration, provider.estimate_gas(tx)).await {
            Ok(Ok(gas)) => Ok(gas),
            Ok(Err(e)) => {
                metrics::record_rpc_error("eth_estimateGas");
                Err(BlockchainError::Rpc(format!("Gas estimation failed: {}", e)))
            }
            Err(_) => Err(BlockchainError::Timeout(self.config.timeout_secs)),
        }
    }

    /// List the accounts the primary node exposes.
    pub async fn get_accounts(&self) -> BlockchainResult<Vec<Address>> {
        match timeout(self.timeout_duration, self.provider().get_accounts()).await {
            Ok(Ok(accounts)) => Ok(accounts),
            Ok(Err(e)) => {
                let denied = e
                    .as_error_resp()
                    .map(|payload| payload.code == USER_REJECTED_CODE)
                    .unwrap_or(false);
                if denied {
                    Err(BlockchainError::AccessDenied)
                } else {
                    Err(BlockchainError::Rpc(format!("Failed to list accounts: {}", e)))
                }
            }
            Err(_) => Err(BlockchainError::Timeout(self.config.timeout_secs)),
        }
    }

    /// Submit a transaction through the primary provider and wait for its
    /// receipt. Never retried.
    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> BlockchainResult<TransactionReceipt> {
        let pending = match timeout(self.timeout_duration, self.provider().send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => {
                metrics::record_rpc_error("eth_sendTransaction");
                return Err(BlockchainError::Rpc(format!("Submission failed: {}", e)));
            }
            Err(_) => return Err(BlockchainError::Timeout(self.config.timeout_secs)),
        };

        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, "Transaction submitted, waiting for receipt");

        let receipt_timeout = Duration::from_secs(self.config.receipt_timeout_secs);
        match timeout(receipt_timeout, pending.get_receipt()).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!(
                "Receipt for {} unavailable: {}",
                tx_hash, e
            ))),
            Err(_) => Err(BlockchainError::Timeout(self.config.receipt_timeout_secs)),
        }
    }

    /// Get the underlying primary provider.
    fn provider(&self) -> &(dyn Provider + Send + Sync) {
        self.providers[0].as_ref()
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
