//! Contract bindings for GameMint and GameNFT.

use alloy::sol;

sol! {
    /// Commit-reveal minting contract.
    #[derive(Debug)]
    interface GameMint {
        function userCommit() external payable;
        function userMint() external;
        function nftPrice() external view returns (uint256);
        function isSetup() external view returns (bool);
        function revealBlock() external view returns (uint256);
        function adminSecret() external view returns (uint256);
        function id_count() external view returns (uint256);
        function ID_COUNT() external view returns (uint256);

        /// Emitted when a user pays to commit.
        event UserCommit(address indexed user, uint256 tokenId);

        /// Emitted when a user mints after the reveal.
        event UserMint(address indexed user, uint256 nftId);
    }

    /// ERC-1155 token contract.
    #[derive(Debug)]
    interface GameNFT {
        function balanceOfBatch(address[] accounts, uint256[] ids) external view returns (uint256[]);
    }
}

/// Name of the id counter getter. Contract revisions disagree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdCounter {
    /// `id_count()`
    #[default]
    Lower,
    /// `ID_COUNT()`
    Upper,
}

impl IdCounter {
    pub fn method_name(&self) -> &'static str {
        match self {
            IdCounter::Lower => "id_count",
            IdCounter::Upper => "ID_COUNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(GameMint::userCommitCall::SIGNATURE, "userCommit()");
        assert_eq!(GameMint::id_countCall::SIGNATURE, "id_count()");
        assert_eq!(GameMint::ID_COUNTCall::SIGNATURE, "ID_COUNT()");
        assert_eq!(
            GameNFT::balanceOfBatchCall::SIGNATURE,
            "balanceOfBatch(address[],uint256[])"
        );
        assert_eq!(GameMint::UserCommit::SIGNATURE, "UserCommit(address,uint256)");
    }

    #[test]
    fn test_id_counter_names() {
        assert_eq!(IdCounter::default().method_name(), "id_count");
        assert_eq!(IdCounter::Upper.method_name(), "ID_COUNT");
    }
}
