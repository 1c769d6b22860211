//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Deployment document (rpcUrl, contract addresses)
//!     → wallet.rs (node accounts or env private key)
//!     → client.rs (RPC connection with timeouts and read failover)
//!     → contracts.rs (GameMint / GameNFT bindings)
//!     → transaction.rs (action requests, receipt checks)
//!     → gateway.rs (MintGateway implementation)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod gateway;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use gateway::AlloyGateway;
pub use types::{BlockchainError, ChainId};
pub use wallet::{Wallet, WalletConnector};
