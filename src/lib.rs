//! Commit-reveal NFT mint client library.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod game;
pub mod lifecycle;
pub mod metadata;
pub mod observability;

pub use config::schema::ClientConfig;
pub use error::{MintError, MintResult};
pub use game::{GamePhase, Session};
pub use lifecycle::Shutdown;
