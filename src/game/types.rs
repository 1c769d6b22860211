//! Game domain types.

use std::fmt;

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

/// Phase of the commit-reveal game, always derived from contract reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// The deployment document says nothing is deployed.
    NotDeployed,
    /// Deployed, waiting for the admin to set reveal block, price and secret hash.
    Setup,
    /// Users may pay to commit until the reveal block.
    Commit,
    /// Commit window closed, waiting for the admin secret.
    Reveal,
    /// Secret revealed, committed users may mint.
    Mint,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotDeployed => "NOT_DEPLOYED",
            GamePhase::Setup => "SETUP",
            GamePhase::Commit => "COMMIT",
            GamePhase::Reveal => "REVEAL",
            GamePhase::Mint => "MINT",
        }
    }

    /// Position in the phase sequence, used as a gauge value.
    pub fn ordinal(&self) -> u8 {
        match self {
            GamePhase::NotDeployed => 0,
            GamePhase::Setup => 1,
            GamePhase::Commit => 2,
            GamePhase::Reveal => 3,
            GamePhase::Mint => 4,
        }
    }

    /// What the user can do right now.
    pub fn describe(&self) -> &'static str {
        match self {
            GamePhase::NotDeployed => "Contracts not deployed. Set contract addresses in params.json.",
            GamePhase::Setup => "Admin should set the reveal block, commit price, and secret hash.",
            GamePhase::Commit => "Pay the set price to commit to a mint before the reveal block is reached.",
            GamePhase::Reveal => "Waiting for admin to reveal the secret.",
            GamePhase::Mint => "You can now mint the NFT you committed to during the commit phase.",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remote values the phase is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseInputs {
    pub deployed: bool,
    pub is_setup: bool,
    pub reveal_block: U256,
    pub current_block: u64,
    pub admin_secret: U256,
}

/// The two mutating actions on the Mint contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintAction {
    /// `userCommit()`, payable.
    Commit,
    /// `userMint()`.
    Mint,
}

impl MintAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MintAction::Commit => "commit",
            MintAction::Mint => "mint",
        }
    }

    /// Phase in which the contract accepts this action.
    pub fn allowed_phase(&self) -> GamePhase {
        match self {
            MintAction::Commit => GamePhase::Commit,
            MintAction::Mint => GamePhase::Mint,
        }
    }
}

/// A `UserCommit` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    pub user: Address,
    pub token_id: U256,
    pub block_number: Option<u64>,
    pub tx_hash: Option<TxHash>,
}

/// A `UserMint` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEvent {
    pub user: Address,
    pub nft_id: U256,
    pub block_number: Option<u64>,
    pub tx_hash: Option<TxHash>,
}

/// Outcome of a settled, successful transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}
