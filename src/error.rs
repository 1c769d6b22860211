//! Client-facing error kinds.
//!
//! Every failure is terminal for the invocation that hit it; nothing in the
//! crate retries on its own.

use thiserror::Error;

use crate::config::ConfigError;
use crate::game::types::GamePhase;

/// Errors surfaced by sessions, the phase resolver and the action dispatcher.
#[derive(Debug, Error)]
pub enum MintError {
    /// An action needs a connected account and none is present.
    #[error("No account connected")]
    MissingAccount,

    /// No wallet could be obtained.
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The wallet refused to expose its accounts.
    #[error("User denied account access")]
    UserDeniedAccess,

    /// A contract view call, log query or document fetch failed.
    #[error("Remote read failed: {0}")]
    RemoteRead(String),

    /// Gas estimation, submission or execution of a transaction failed.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// The session has no contract handles (nothing deployed).
    #[error("Contracts are not loaded")]
    ContractsUnavailable,

    /// The action is not allowed in the current phase.
    #[error("{action} is not allowed during the {phase} phase")]
    WrongPhase { action: &'static str, phase: GamePhase },

    /// A previous action on this session has not settled yet.
    #[error("Another action is still in flight")]
    ActionInProgress,

    /// Configuration or deployment document problem.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for client operations.
pub type MintResult<T> = Result<T, MintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(MintError::MissingAccount.to_string(), "No account connected");

        let err = MintError::WrongPhase {
            action: "mint",
            phase: GamePhase::Commit,
        };
        assert_eq!(err.to_string(), "mint is not allowed during the COMMIT phase");

        let err = MintError::RemoteRead("isSetup: timeout".to_string());
        assert!(err.to_string().contains("isSetup"));
    }
}
