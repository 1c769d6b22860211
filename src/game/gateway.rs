//! The contract gateway seam.
//!
//! Everything the game logic needs from the two contracts goes through
//! [`MintGateway`]. The alloy-backed implementation lives in
//! `blockchain::gateway`; tests use the in-memory mock.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::MintResult;
use crate::game::types::{ActionReceipt, CommitEvent, MintAction, MintEvent};

/// Reads and writes against the Mint and NFT contracts.
///
/// Read methods fail with `RemoteRead`; `estimate_gas` and `submit` fail with
/// `Transaction`.
#[async_trait]
pub trait MintGateway: Send + Sync {
    async fn is_setup(&self) -> MintResult<bool>;

    async fn reveal_block(&self) -> MintResult<U256>;

    /// Latest chain height.
    async fn current_block(&self) -> MintResult<u64>;

    /// Zero until the admin reveals.
    async fn admin_secret(&self) -> MintResult<U256>;

    async fn nft_price(&self) -> MintResult<U256>;

    /// Size of the token id space.
    async fn id_count(&self) -> MintResult<U256>;

    /// NFT contract `balanceOfBatch`; `accounts` and `ids` have equal length.
    async fn balance_of_batch(&self, accounts: Vec<Address>, ids: Vec<U256>)
        -> MintResult<Vec<U256>>;

    async fn commit_events(&self) -> MintResult<Vec<CommitEvent>>;

    async fn mint_events(&self) -> MintResult<Vec<MintEvent>>;

    /// Estimate gas for `action` sent from `from` carrying `value` wei.
    async fn estimate_gas(&self, from: Address, action: MintAction, value: U256) -> MintResult<u64>;

    /// Submit `action` with an explicit gas limit and wait for the receipt.
    async fn submit(
        &self,
        from: Address,
        action: MintAction,
        value: U256,
        gas: u64,
    ) -> MintResult<ActionReceipt>;
}

/// Shared handle to both contracts, owned by a session.
pub type ContractHandles = Arc<dyn MintGateway>;
