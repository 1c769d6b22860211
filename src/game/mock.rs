//! Mock contract gateway for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::error::{MintError, MintResult};
use crate::game::gateway::MintGateway;
use crate::game::types::{ActionReceipt, CommitEvent, MintAction, MintEvent};

#[derive(Default)]
struct MockState {
    is_setup: bool,
    reveal_block: u64,
    block: u64,
    secret: u64,
    price: u64,
    id_count: u64,
    balances: HashMap<(Address, u64), u64>,
    commits: Vec<CommitEvent>,
    mints: Vec<MintEvent>,
    calls: Vec<&'static str>,
    failing_read: Option<&'static str>,
    fail_transactions: bool,
    submit_delay: Duration,
    estimates: Vec<(MintAction, U256)>,
    submitted: Vec<(MintAction, U256, u64)>,
}

/// In-memory contract pair. Every trait call is recorded by method name.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_setup(&self, is_setup: bool) {
        self.state.lock().unwrap().is_setup = is_setup;
    }

    pub fn set_reveal_block(&self, block: u64) {
        self.state.lock().unwrap().reveal_block = block;
    }

    pub fn set_block(&self, block: u64) {
        self.state.lock().unwrap().block = block;
    }

    pub fn set_secret(&self, secret: u64) {
        self.state.lock().unwrap().secret = secret;
    }

    pub fn set_price(&self, price: u64) {
        self.state.lock().unwrap().price = price;
    }

    pub fn set_id_count(&self, count: u64) {
        self.state.lock().unwrap().id_count = count;
    }

    pub fn give(&self, owner: Address, id: u64, amount: u64) {
        self.state.lock().unwrap().balances.insert((owner, id), amount);
    }

    pub fn push_commit(&self, user: Address, token_id: u64) {
        self.state.lock().unwrap().commits.push(CommitEvent {
            user,
            token_id: U256::from(token_id),
            block_number: Some(1),
            tx_hash: None,
        });
    }

    pub fn push_mint(&self, user: Address, nft_id: u64) {
        self.state.lock().unwrap().mints.push(MintEvent {
            user,
            nft_id: U256::from(nft_id),
            block_number: Some(2),
            tx_hash: None,
        });
    }

    /// Make the named read fail with `RemoteRead`.
    pub fn fail_reads(&self, method: &'static str) {
        self.state.lock().unwrap().failing_read = Some(method);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.failing_read = None;
        state.fail_transactions = false;
    }

    pub fn fail_transactions(&self) {
        self.state.lock().unwrap().fail_transactions = true;
    }

    pub fn set_submit_delay(&self, delay: Duration) {
        self.state.lock().unwrap().submit_delay = delay;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn estimates(&self) -> Vec<(MintAction, U256)> {
        self.state.lock().unwrap().estimates.clone()
    }

    pub fn submitted(&self) -> Vec<(MintAction, U256, u64)> {
        self.state.lock().unwrap().submitted.clone()
    }

    fn read<T>(&self, method: &'static str, f: impl FnOnce(&MockState) -> T) -> MintResult<T> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method);
        if state.failing_read == Some(method) {
            return Err(MintError::RemoteRead(format!("{}: mock failure", method)));
        }
        Ok(f(&state))
    }
}

#[async_trait]
impl MintGateway for MockGateway {
    async fn is_setup(&self) -> MintResult<bool> {
        self.read("isSetup", |s| s.is_setup)
    }

    async fn reveal_block(&self) -> MintResult<U256> {
        self.read("revealBlock", |s| U256::from(s.reveal_block))
    }

    async fn current_block(&self) -> MintResult<u64> {
        self.read("eth_blockNumber", |s| s.block)
    }

    async fn admin_secret(&self) -> MintResult<U256> {
        self.read("adminSecret", |s| U256::from(s.secret))
    }

    async fn nft_price(&self) -> MintResult<U256> {
        self.read("nftPrice", |s| U256::from(s.price))
    }

    async fn id_count(&self) -> MintResult<U256> {
        self.read("id_count", |s| U256::from(s.id_count))
    }

    async fn balance_of_batch(
        &self,
        accounts: Vec<Address>,
        ids: Vec<U256>,
    ) -> MintResult<Vec<U256>> {
        self.read("balanceOfBatch", |s| {
            assert_eq!(accounts.len(), ids.len(), "balanceOfBatch length mismatch");
            accounts
                .iter()
                .zip(ids.iter())
                .map(|(owner, id)| {
                    let id: u64 = id.to::<u64>();
                    U256::from(s.balances.get(&(*owner, id)).copied().unwrap_or(0))
                })
                .collect()
        })
    }

    async fn commit_events(&self) -> MintResult<Vec<CommitEvent>> {
        self.read("UserCommit", |s| s.commits.clone())
    }

    async fn mint_events(&self) -> MintResult<Vec<MintEvent>> {
        self.read("UserMint", |s| s.mints.clone())
    }

    async fn estimate_gas(&self, _from: Address, action: MintAction, value: U256) -> MintResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("estimateGas");
        if state.fail_transactions {
            return Err(MintError::Transaction("execution reverted".to_string()));
        }
        state.estimates.push((action, value));
        Ok(50_000)
    }

    async fn submit(
        &self,
        _from: Address,
        action: MintAction,
        value: U256,
        gas: u64,
    ) -> MintResult<ActionReceipt> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push("sendTransaction");
            if state.fail_transactions {
                return Err(MintError::Transaction("execution reverted".to_string()));
            }
            state.submitted.push((action, value, gas));
            state.submit_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let block = self.state.lock().unwrap().block;
        Ok(ActionReceipt {
            tx_hash: B256::repeat_byte(0x11),
            block_number: Some(block),
            gas_used: gas,
        })
    }
}
