//! Session: everything one connected user works with.
//!
//! A session is built once per connect and passed explicitly to whatever
//! needs it. It owns the settings, the adopted deployment document, the
//! contract handles built from it, and the account. The deployment part can
//! be swapped atomically when the document is reloaded; the account stays.
//!
//! [`Session::refresh`] is the single state refresh used by the poller and
//! after every action.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use arc_swap::ArcSwap;
use serde::Serialize;

use crate::blockchain::contracts::IdCounter;
use crate::blockchain::{AlloyGateway, BlockchainClient, WalletConnector};
use crate::config::abi::{load_interfaces, ContractInterfaces};
use crate::config::loader::load_deployment;
use crate::config::schema::{ClientConfig, DeploymentConfig, DocumentSource};
use crate::config::validation::{validate_deployment, ValidationError};
use crate::config::ConfigError;
use crate::error::{MintError, MintResult};
use crate::game::dispatcher;
use crate::game::gateway::{ContractHandles, MintGateway};
use crate::game::phase::read_phase;
use crate::game::tokens::{self, get_owned_token_ids};
use crate::game::types::{ActionReceipt, CommitEvent, GamePhase, MintAction, MintEvent};
use crate::metadata::{MetadataClient, TokenMetadata, TokenView};
use crate::observability::metrics;

/// The part of a session that follows the deployment document.
pub struct SessionState {
    pub deployment: DeploymentConfig,
    pub client: Option<BlockchainClient>,
    pub contracts: Option<ContractHandles>,
}

impl SessionState {
    fn contracts(&self) -> Option<&dyn MintGateway> {
        self.contracts.as_deref()
    }
}

/// Point-in-time view of the game for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub block_height: Option<u64>,
    pub account: Option<Address>,
    pub owned_tokens: Vec<u64>,
    pub busy: bool,
    pub last_error: Option<String>,
}

/// What produced the displayed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorSource {
    Refresh,
    Action,
}

/// Marks an action as outstanding until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> MintResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| MintError::ActionInProgress)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session {
    config: ClientConfig,
    http: reqwest::Client,
    connector: Option<WalletConnector>,
    id_counter: IdCounter,
    state: ArcSwap<SessionState>,
    account: Option<Address>,
    metadata: MetadataClient,
    busy: AtomicBool,
    last_error: Mutex<Option<(ErrorSource, String)>>,
}

impl Session {
    /// Load documents and build contract handles, without a wallet.
    pub async fn load(config: ClientConfig) -> MintResult<Self> {
        Self::open(config, None).await
    }

    /// Load documents, connect the wallet and request the active account.
    pub async fn connect(config: ClientConfig) -> MintResult<Self> {
        let connector = WalletConnector::new(config.wallet.clone())?;
        Self::open(config, Some(connector)).await
    }

    async fn open(config: ClientConfig, connector: Option<WalletConnector>) -> MintResult<Self> {
        let http = reqwest::Client::new();
        let source = DocumentSource::parse(&config.deployment.params);
        let deployment = load_deployment(&source, &http)
            .await
            .map_err(|e| MintError::RemoteRead(format!("deployment document {}: {}", source, e)))?;
        let ContractInterfaces { id_counter } = load_interfaces(&config.deployment, &http).await?;

        let state = build_state(&config, connector.as_ref(), id_counter, deployment).await?;

        let account = match &connector {
            Some(connector) => {
                let client = state.client.as_ref().ok_or_else(|| {
                    MintError::WalletUnavailable("No RPC endpoint configured".to_string())
                })?;
                let account = connector.request_account(client).await?;
                tracing::info!(account = %account, "Wallet connected");
                Some(account)
            }
            None => None,
        };

        let metadata = MetadataClient::new(&config.metadata)?;

        Ok(Self {
            config,
            http,
            connector,
            id_counter,
            state: ArcSwap::from_pointee(state),
            account,
            metadata,
            busy: AtomicBool::new(false),
            last_error: Mutex::new(None),
        })
    }

    /// Assemble a session from ready-made parts.
    pub fn from_parts(
        config: ClientConfig,
        deployment: DeploymentConfig,
        contracts: Option<ContractHandles>,
        account: Option<Address>,
    ) -> MintResult<Self> {
        let metadata = MetadataClient::new(&config.metadata)?;
        Ok(Self {
            config,
            http: reqwest::Client::new(),
            connector: None,
            id_counter: IdCounter::default(),
            state: ArcSwap::from_pointee(SessionState {
                deployment,
                client: None,
                contracts,
            }),
            account,
            metadata,
            busy: AtomicBool::new(false),
            last_error: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn deployment(&self) -> DeploymentConfig {
        self.state.load().deployment.clone()
    }

    pub fn metadata(&self) -> &MetadataClient {
        &self.metadata
    }

    /// True while an action is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Message of the most recent failure.
    ///
    /// A successful action clears it. A successful refresh only clears a
    /// failed refresh, so an action's error stays visible across polls.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|(_, message)| message.clone()))
    }

    fn record<T>(&self, source: ErrorSource, result: &MintResult<T>) {
        let Ok(mut slot) = self.last_error.lock() else {
            return;
        };
        match result {
            Err(e) => *slot = Some((source, e.to_string())),
            Ok(_) if source == ErrorSource::Action => *slot = None,
            Ok(_) => {
                if matches!(*slot, Some((ErrorSource::Refresh, _))) {
                    *slot = None;
                }
            }
        }
    }

    /// Adopt a new deployment document, rebuilding contract handles.
    ///
    /// Unchanged documents are ignored. On failure the current state stays.
    pub async fn apply_deployment(&self, deployment: DeploymentConfig) -> MintResult<()> {
        if self.state.load().deployment == deployment {
            return Ok(());
        }
        let state = build_state(&self.config, self.connector.as_ref(), self.id_counter, deployment).await?;
        tracing::info!(
            deployed = state.deployment.deployed,
            mint = %state.deployment.mint_contract_address,
            "Deployment document adopted"
        );
        self.state.store(Arc::new(state));
        Ok(())
    }

    /// Re-read the deployment document from its source and adopt it.
    pub async fn reload_deployment(&self) -> MintResult<()> {
        let source = DocumentSource::parse(&self.config.deployment.params);
        let deployment = load_deployment(&source, &self.http)
            .await
            .map_err(|e| MintError::RemoteRead(format!("deployment document {}: {}", source, e)))?;
        self.apply_deployment(deployment).await
    }

    /// Current phase.
    pub async fn phase(&self) -> MintResult<GamePhase> {
        let state = self.state.load_full();
        read_phase(&state.deployment, state.contracts()).await
    }

    /// Recompute everything the client displays.
    pub async fn refresh(&self) -> MintResult<Snapshot> {
        let mut result = self.read_snapshot().await;
        self.record(ErrorSource::Refresh, &result);
        if let Ok(snapshot) = &mut result {
            snapshot.last_error = self.last_error();
            metrics::record_phase(snapshot.phase);
            if let Some(height) = snapshot.block_height {
                metrics::record_block_height(height);
            }
            tracing::debug!(phase = %snapshot.phase, height = ?snapshot.block_height, "State refreshed");
        }
        result
    }

    async fn read_snapshot(&self) -> MintResult<Snapshot> {
        let state = self.state.load_full();
        let phase = read_phase(&state.deployment, state.contracts()).await?;

        let block_height = match state.contracts() {
            Some(contracts) if phase != GamePhase::NotDeployed => Some(contracts.current_block().await?),
            _ => None,
        };
        let owned_tokens = if phase == GamePhase::NotDeployed {
            Vec::new()
        } else {
            get_owned_token_ids(self.account, state.contracts(), self.config.polling.max_token_scan)
                .await?
        };

        Ok(Snapshot {
            phase,
            block_height,
            account: self.account,
            owned_tokens,
            busy: self.is_busy(),
            last_error: None,
        })
    }

    /// Commit during the COMMIT phase.
    pub async fn commit(&self) -> MintResult<ActionReceipt> {
        self.run_action(MintAction::Commit).await
    }

    /// Mint during the MINT phase.
    pub async fn mint(&self) -> MintResult<ActionReceipt> {
        self.run_action(MintAction::Mint).await
    }

    async fn run_action(&self, action: MintAction) -> MintResult<ActionReceipt> {
        let result = match InFlight::acquire(&self.busy) {
            Ok(in_flight) => {
                let result = self.gated_action(action).await;
                drop(in_flight);
                if let Err(e) = self.refresh().await {
                    tracing::warn!(action = action.as_str(), error = %e, "Refresh after action failed");
                }
                result
            }
            // The running action refreshes when it finishes
            Err(e) => Err(e),
        };

        // The action's own outcome is what gets displayed
        self.record(ErrorSource::Action, &result);
        result
    }

    async fn gated_action(&self, action: MintAction) -> MintResult<ActionReceipt> {
        if self.account.is_none() {
            return Err(MintError::MissingAccount);
        }

        let state = self.state.load_full();
        let phase = read_phase(&state.deployment, state.contracts()).await?;
        if phase != action.allowed_phase() {
            return Err(MintError::WrongPhase {
                action: action.as_str(),
                phase,
            });
        }

        match action {
            MintAction::Commit => dispatcher::commit(self.account, state.contracts()).await,
            MintAction::Mint => dispatcher::mint(self.account, state.contracts()).await,
        }
    }

    /// Tokens owned by `address`, or by the session account when `None`.
    pub async fn owned_tokens(&self, address: Option<Address>) -> MintResult<Vec<u64>> {
        let state = self.state.load_full();
        get_owned_token_ids(
            address.or(self.account),
            state.contracts(),
            self.config.polling.max_token_scan,
        )
        .await
    }

    pub async fn commit_events(&self) -> MintResult<Vec<CommitEvent>> {
        let state = self.state.load_full();
        tokens::get_commit_events(state.contracts()).await
    }

    pub async fn mint_events(&self) -> MintResult<Vec<MintEvent>> {
        let state = self.state.load_full();
        tokens::get_mint_events(state.contracts()).await
    }

    /// Every token in the id space with its metadata.
    pub async fn explore(&self) -> MintResult<Vec<TokenView>> {
        let state = self.state.load_full();
        let contracts = state.contracts().ok_or(MintError::ContractsUnavailable)?;
        let ids = tokens::all_token_ids(contracts, self.config.polling.max_token_scan).await?;
        self.metadata.fetch_many(&ids).await
    }

    /// Metadata of the owned tokens.
    pub async fn owned_token_views(&self, address: Option<Address>) -> MintResult<Vec<TokenView>> {
        let ids = self.owned_tokens(address).await?;
        self.metadata.fetch_many(&ids).await
    }

    pub async fn token_metadata(&self, token_id: u64) -> MintResult<TokenMetadata> {
        self.metadata.fetch(token_id).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("deployed", &state.deployment.deployed)
            .field("contracts", &state.contracts.is_some())
            .field("busy", &self.is_busy())
            .finish()
    }
}

/// Build the deployment-dependent part of a session.
async fn build_state(
    config: &ClientConfig,
    connector: Option<&WalletConnector>,
    id_counter: IdCounter,
    deployment: DeploymentConfig,
) -> MintResult<SessionState> {
    let rpc_url = config
        .rpc
        .url_override
        .clone()
        .unwrap_or_else(|| deployment.rpc_url.clone());

    validate_deployment(&deployment, config.rpc.url_override.is_none())
        .map_err(|errors| MintError::Config(ConfigError::Validation(errors)))?;

    let client = if rpc_url.is_empty() {
        None
    } else {
        let signer = connector.and_then(WalletConnector::signer);
        Some(
            BlockchainClient::new(&rpc_url, config.rpc.clone(), signer)
                .await
                .map_err(|e| MintError::RemoteRead(e.to_string()))?,
        )
    };

    let contracts = match (&client, deployment.deployed) {
        (Some(client), true) => {
            let mint = parse_address("mintContractAddress", &deployment.mint_contract_address)?;
            let nft = parse_address("nftContractAddress", &deployment.nft_contract_address)?;
            Some(Arc::new(AlloyGateway::new(client.clone(), mint, nft, id_counter)) as ContractHandles)
        }
        (None, true) => {
            tracing::warn!("Deployment marked deployed but no RPC URL is available");
            None
        }
        _ => None,
    };

    Ok(SessionState {
        deployment,
        client,
        contracts,
    })
}

fn parse_address(field: &'static str, value: &str) -> MintResult<Address> {
    value.parse().map_err(|e| {
        MintError::Config(ConfigError::Validation(vec![ValidationError::new(
            field,
            format!("invalid address '{}': {}", value, e),
        )]))
    })
}
