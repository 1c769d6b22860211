//! Commit and mint actions.
//!
//! Both are one-shot: estimate, submit, wait for the receipt. Nothing is
//! retried and local state is not refreshed here; `Session` does that once
//! the action settles.

use alloy::primitives::{Address, U256};

use crate::error::{MintError, MintResult};
use crate::game::gateway::MintGateway;
use crate::game::types::{ActionReceipt, MintAction};
use crate::observability::metrics;

fn require_account(account: Option<Address>) -> MintResult<Address> {
    match account {
        Some(account) if !account.is_zero() => Ok(account),
        _ => Err(MintError::MissingAccount),
    }
}

fn require_contracts(contracts: Option<&dyn MintGateway>) -> MintResult<&dyn MintGateway> {
    contracts.ok_or(MintError::ContractsUnavailable)
}

/// Pay the current price to commit.
///
/// Reads `nftPrice()`, estimates gas for `userCommit()` carrying exactly that
/// value, then submits with the estimate as the gas limit.
pub async fn commit(
    account: Option<Address>,
    contracts: Option<&dyn MintGateway>,
) -> MintResult<ActionReceipt> {
    let account = require_account(account)?;
    let contracts = require_contracts(contracts)?;

    let price = contracts.nft_price().await?;
    let result = send(contracts, account, MintAction::Commit, price).await;
    metrics::record_action(MintAction::Commit, result.is_ok());
    result
}

/// Mint the NFT committed to earlier.
pub async fn mint(
    account: Option<Address>,
    contracts: Option<&dyn MintGateway>,
) -> MintResult<ActionReceipt> {
    let account = require_account(account)?;
    let contracts = require_contracts(contracts)?;

    let result = send(contracts, account, MintAction::Mint, U256::ZERO).await;
    metrics::record_action(MintAction::Mint, result.is_ok());
    result
}

async fn send(
    contracts: &dyn MintGateway,
    account: Address,
    action: MintAction,
    value: U256,
) -> MintResult<ActionReceipt> {
    let gas = contracts.estimate_gas(account, action, value).await?;
    tracing::info!(
        action = action.as_str(),
        account = %account,
        value = %value,
        gas,
        "Submitting transaction"
    );

    let receipt = contracts.submit(account, action, value, gas).await?;
    tracing::info!(
        action = action.as_str(),
        tx_hash = %receipt.tx_hash,
        block_number = ?receipt.block_number,
        gas_used = receipt.gas_used,
        "Transaction confirmed"
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::mock::MockGateway;

    fn user() -> Address {
        Address::repeat_byte(0x42)
    }

    #[tokio::test]
    async fn test_commit_without_account_makes_no_calls() {
        let mock = MockGateway::new();
        let err = commit(None, Some(&mock)).await.unwrap_err();
        assert!(matches!(err, MintError::MissingAccount));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mint_without_account() {
        let mock = MockGateway::new();
        let err = mint(Some(Address::ZERO), Some(&mock)).await.unwrap_err();
        assert!(matches!(err, MintError::MissingAccount));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_contracts() {
        let err = commit(Some(user()), None).await.unwrap_err();
        assert!(matches!(err, MintError::ContractsUnavailable));
    }

    #[tokio::test]
    async fn test_commit_sends_exact_price() {
        let mock = MockGateway::new();
        mock.set_price(10_000_000_000_000_000);

        let receipt = commit(Some(user()), Some(&mock)).await.unwrap();
        assert_eq!(receipt.gas_used, 50_000);

        let price = U256::from(10_000_000_000_000_000u64);
        assert_eq!(mock.calls(), vec!["nftPrice", "estimateGas", "sendTransaction"]);
        assert_eq!(mock.estimates(), vec![(MintAction::Commit, price)]);
        assert_eq!(mock.submitted(), vec![(MintAction::Commit, price, 50_000)]);
    }

    #[tokio::test]
    async fn test_mint_sends_no_value() {
        let mock = MockGateway::new();
        mint(Some(user()), Some(&mock)).await.unwrap();
        assert_eq!(mock.calls(), vec!["estimateGas", "sendTransaction"]);
        assert_eq!(mock.submitted(), vec![(MintAction::Mint, U256::ZERO, 50_000)]);
    }

    #[tokio::test]
    async fn test_estimate_failure_stops_submission() {
        let mock = MockGateway::new();
        mock.fail_transactions();
        let err = mint(Some(user()), Some(&mock)).await.unwrap_err();
        assert!(matches!(err, MintError::Transaction(_)));
        assert!(mock.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_price_read_failure_is_remote_read() {
        let mock = MockGateway::new();
        mock.fail_reads("nftPrice");
        let err = commit(Some(user()), Some(&mock)).await.unwrap_err();
        assert!(matches!(err, MintError::RemoteRead(_)));
        assert!(mock.estimates().is_empty());
    }
}
