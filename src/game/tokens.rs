//! Token id queries and event history.

use alloy::primitives::{Address, U256};

use crate::error::{MintError, MintResult};
use crate::game::gateway::MintGateway;
use crate::game::types::{CommitEvent, MintEvent};

/// Current size of the token id space.
pub async fn get_max_id(contracts: &dyn MintGateway) -> MintResult<U256> {
    contracts.id_count().await
}

/// Ids `0..id_count`, capped at `max_scan`.
pub async fn all_token_ids(contracts: &dyn MintGateway, max_scan: u64) -> MintResult<Vec<u64>> {
    let count = get_max_id(contracts).await?;
    let count = u64::try_from(count)
        .map_err(|_| MintError::RemoteRead(format!("id counter out of range: {}", count)))?;

    if count > max_scan {
        tracing::warn!(id_count = count, max_scan, "Token id space truncated");
    }
    Ok((0..count.min(max_scan)).collect())
}

/// Ids owned by `address`, in ascending id order.
///
/// An absent address or absent contracts yield an empty list. All ids are
/// checked with a single `balanceOfBatch`, the owner repeated per id.
pub async fn get_owned_token_ids(
    address: Option<Address>,
    contracts: Option<&dyn MintGateway>,
    max_scan: u64,
) -> MintResult<Vec<u64>> {
    let (address, contracts) = match (address, contracts) {
        (Some(address), Some(contracts)) => (address, contracts),
        _ => return Ok(Vec::new()),
    };

    let ids = all_token_ids(contracts, max_scan).await?;
    if ids.is_empty() {
        return Ok(ids);
    }

    let accounts = vec![address; ids.len()];
    let query: Vec<U256> = ids.iter().map(|id| U256::from(*id)).collect();
    let balances = contracts.balance_of_batch(accounts, query).await?;

    if balances.len() != ids.len() {
        return Err(MintError::RemoteRead(format!(
            "balanceOfBatch returned {} balances for {} ids",
            balances.len(),
            ids.len()
        )));
    }

    let owned: Vec<u64> = ids
        .into_iter()
        .zip(balances)
        .filter(|(_, balance)| !balance.is_zero())
        .map(|(id, _)| id)
        .collect();

    tracing::debug!(address = %address, owned = owned.len(), "Owned tokens resolved");
    Ok(owned)
}

/// Every `UserCommit` since genesis.
pub async fn get_commit_events(contracts: Option<&dyn MintGateway>) -> MintResult<Vec<CommitEvent>> {
    match contracts {
        Some(contracts) => contracts.commit_events().await,
        None => Ok(Vec::new()),
    }
}

/// Every `UserMint` since genesis.
pub async fn get_mint_events(contracts: Option<&dyn MintGateway>) -> MintResult<Vec<MintEvent>> {
    match contracts {
        Some(contracts) => contracts.mint_events().await,
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::mock::MockGateway;

    #[tokio::test]
    async fn test_owned_ids_in_scan_order() {
        let owner = Address::repeat_byte(0x07);
        let other = Address::repeat_byte(0x08);
        let mock = MockGateway::new();
        mock.set_id_count(10);
        mock.give(owner, 5, 1);
        mock.give(owner, 2, 3);
        mock.give(other, 4, 1);

        let owned = get_owned_token_ids(Some(owner), Some(&mock), 10_000).await.unwrap();
        assert_eq!(owned, vec![2, 5]);
    }

    #[tokio::test]
    async fn test_owned_ids_without_address() {
        let mock = MockGateway::new();
        mock.set_id_count(10);
        let owned = get_owned_token_ids(None, Some(&mock), 10_000).await.unwrap();
        assert!(owned.is_empty());
        assert_eq!(mock.call_count(), 0);

        let owned = get_owned_token_ids(Some(Address::ZERO), None, 10_000).await.unwrap();
        assert!(owned.is_empty());
    }

    #[tokio::test]
    async fn test_empty_id_space_skips_batch_call() {
        let mock = MockGateway::new();
        let owned = get_owned_token_ids(Some(Address::ZERO), Some(&mock), 10_000).await.unwrap();
        assert!(owned.is_empty());
        assert_eq!(mock.calls(), vec!["id_count"]);
    }

    #[tokio::test]
    async fn test_scan_cap() {
        let owner = Address::repeat_byte(0x07);
        let mock = MockGateway::new();
        mock.set_id_count(10);
        mock.give(owner, 2, 1);
        mock.give(owner, 8, 1);

        let owned = get_owned_token_ids(Some(owner), Some(&mock), 5).await.unwrap();
        assert_eq!(owned, vec![2]);
        assert_eq!(all_token_ids(&mock, 5).await.unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_events_pass_through() {
        let user = Address::repeat_byte(0x09);
        let mock = MockGateway::new();
        mock.push_commit(user, 3);
        mock.push_mint(user, 3);

        let commits = get_commit_events(Some(&mock)).await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].token_id, U256::from(3));

        let mints = get_mint_events(Some(&mock)).await.unwrap();
        assert_eq!(mints[0].user, user);

        assert!(get_commit_events(None).await.unwrap().is_empty());
    }
}
