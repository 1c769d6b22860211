//! Alloy-backed [`MintGateway`].

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::network::TransactionBuilder;
use alloy::sol_types::{SolCall, SolEvent};
use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contracts::{GameMint, GameNFT, IdCounter};
use crate::blockchain::transaction::{receipt_outcome, TxBuilder};
use crate::blockchain::types::BlockchainError;
use crate::error::{MintError, MintResult};
use crate::game::gateway::MintGateway;
use crate::game::types::{ActionReceipt, CommitEvent, MintAction, MintEvent};

/// Contract handles for one deployment.
#[derive(Debug, Clone)]
pub struct AlloyGateway {
    client: BlockchainClient,
    mint_contract: Address,
    nft_contract: Address,
    id_counter: IdCounter,
}

fn read_error(method: &str, e: BlockchainError) -> MintError {
    MintError::RemoteRead(format!("{}: {}", method, e))
}

fn tx_error(stage: &str, e: BlockchainError) -> MintError {
    MintError::Transaction(format!("{}: {}", stage, e))
}

impl AlloyGateway {
    pub fn new(
        client: BlockchainClient,
        mint_contract: Address,
        nft_contract: Address,
        id_counter: IdCounter,
    ) -> Self {
        tracing::debug!(
            mint = %mint_contract,
            nft = %nft_contract,
            id_counter = id_counter.method_name(),
            "Contract handles created"
        );
        Self {
            client,
            mint_contract,
            nft_contract,
            id_counter,
        }
    }

    /// `eth_call` a view method and decode its return value.
    async fn view<C: SolCall>(&self, to: Address, call: C) -> MintResult<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(Bytes::from(call.abi_encode()));
        let data = self
            .client
            .call(tx)
            .await
            .map_err(|e| read_error(C::SIGNATURE, e))?;
        C::abi_decode_returns(&data)
            .map_err(|e| read_error(C::SIGNATURE, BlockchainError::Decode(e.to_string())))
    }

    fn event_filter(&self, signature: &str) -> Filter {
        Filter::new()
            .address(self.mint_contract)
            .from_block(0u64)
            .to_block(BlockNumberOrTag::Latest)
            .event(signature)
    }
}

#[async_trait]
impl MintGateway for AlloyGateway {
    async fn is_setup(&self) -> MintResult<bool> {
        self.view(self.mint_contract, GameMint::isSetupCall {}).await
    }

    async fn reveal_block(&self) -> MintResult<U256> {
        self.view(self.mint_contract, GameMint::revealBlockCall {}).await
    }

    async fn current_block(&self) -> MintResult<u64> {
        self.client
            .get_block_number()
            .await
            .map_err(|e| read_error("eth_blockNumber", e))
    }

    async fn admin_secret(&self) -> MintResult<U256> {
        self.view(self.mint_contract, GameMint::adminSecretCall {}).await
    }

    async fn nft_price(&self) -> MintResult<U256> {
        self.view(self.mint_contract, GameMint::nftPriceCall {}).await
    }

    async fn id_count(&self) -> MintResult<U256> {
        match self.id_counter {
            IdCounter::Lower => self.view(self.mint_contract, GameMint::id_countCall {}).await,
            IdCounter::Upper => self.view(self.mint_contract, GameMint::ID_COUNTCall {}).await,
        }
    }

    async fn balance_of_batch(
        &self,
        accounts: Vec<Address>,
        ids: Vec<U256>,
    ) -> MintResult<Vec<U256>> {
        self.view(self.nft_contract, GameNFT::balanceOfBatchCall { accounts, ids })
            .await
    }

    async fn commit_events(&self) -> MintResult<Vec<CommitEvent>> {
        let filter = self.event_filter(GameMint::UserCommit::SIGNATURE);
        let logs = self
            .client
            .get_logs(&filter)
            .await
            .map_err(|e| read_error("UserCommit logs", e))?;

        let mut events = Vec::with_capacity(logs.len());
        for log in logs {
            match log.log_decode::<GameMint::UserCommit>() {
                Ok(decoded) => events.push(CommitEvent {
                    user: decoded.inner.data.user,
                    token_id: decoded.inner.data.tokenId,
                    block_number: log.block_number,
                    tx_hash: log.transaction_hash,
                }),
                Err(e) => tracing::warn!(error = %e, "Skipping undecodable UserCommit log"),
            }
        }
        Ok(events)
    }

    async fn mint_events(&self) -> MintResult<Vec<MintEvent>> {
        let filter = self.event_filter(GameMint::UserMint::SIGNATURE);
        let logs = self
            .client
            .get_logs(&filter)
            .await
            .map_err(|e| read_error("UserMint logs", e))?;

        let mut events = Vec::with_capacity(logs.len());
        for log in logs {
            match log.log_decode::<GameMint::UserMint>() {
                Ok(decoded) => events.push(MintEvent {
                    user: decoded.inner.data.user,
                    nft_id: decoded.inner.data.nftId,
                    block_number: log.block_number,
                    tx_hash: log.transaction_hash,
                }),
                Err(e) => tracing::warn!(error = %e, "Skipping undecodable UserMint log"),
            }
        }
        Ok(events)
    }

    async fn estimate_gas(&self, from: Address, action: MintAction, value: U256) -> MintResult<u64> {
        let tx = TxBuilder::new(self.mint_contract).build(from, action, value, None);
        self.client
            .estimate_gas(tx)
            .await
            .map_err(|e| tx_error(action.as_str(), e))
    }

    async fn submit(
        &self,
        from: Address,
        action: MintAction,
        value: U256,
        gas: u64,
    ) -> MintResult<ActionReceipt> {
        let tx = TxBuilder::new(self.mint_contract).build(from, action, value, Some(gas));
        let receipt = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| tx_error(action.as_str(), e))?;
        receipt_outcome(&receipt).map_err(|e| tx_error(action.as_str(), e))
    }
}
