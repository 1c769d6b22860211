//! Transaction building and receipt handling for Mint contract actions.
//!
//! # Responsibilities
//! - Encode `userCommit` / `userMint` calls
//! - Build requests for estimation and for submission with an explicit gas limit
//! - Turn a mined receipt into an action outcome, rejecting reverts

use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;

use crate::blockchain::contracts::GameMint;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::game::types::{ActionReceipt, MintAction};

/// Builds action transactions against a Mint contract.
#[derive(Debug, Clone, Copy)]
pub struct TxBuilder {
    mint_contract: Address,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(mint_contract: Address) -> Self {
        Self { mint_contract }
    }

    /// Calldata for an action.
    pub fn input(action: MintAction) -> Bytes {
        match action {
            MintAction::Commit => GameMint::userCommitCall {}.abi_encode().into(),
            MintAction::Mint => GameMint::userMintCall {}.abi_encode().into(),
        }
    }

    /// Build a transaction request.
    ///
    /// # Arguments
    /// * `from` - Sending account
    /// * `action` - Which Mint method to call
    /// * `value` - Wei attached; zero leaves the field unset
    /// * `gas` - Gas limit, `None` for estimation requests
    pub fn build(
        &self,
        from: Address,
        action: MintAction,
        value: U256,
        gas: Option<u64>,
    ) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.mint_contract)
            .with_input(Self::input(action));

        if !value.is_zero() {
            tx = tx.with_value(value);
        }
        if let Some(gas) = gas {
            tx = tx.with_gas_limit(gas);
        }
        tx
    }
}

/// Convert a receipt into an action outcome.
pub fn receipt_outcome(receipt: &TransactionReceipt) -> BlockchainResult<ActionReceipt> {
    let tx_hash = receipt.transaction_hash();
    if !receipt.status() {
        return Err(BlockchainError::Reverted(tx_hash.to_string()));
    }
    Ok(ActionReceipt {
        tx_hash,
        block_number: receipt.block_number(),
        gas_used: receipt.gas_used(),
    })
}
