//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! client.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!
//! params.json (file or URL)
//!     → loader.rs (fetch & parse)
//!     → validation.rs (addresses, rpcUrl)
//!     → DeploymentConfig, adopted by a session
//!
//! GameMint.json / GameNFT.json (optional)
//!     → abi.rs (interface check, id counter name)
//!
//! On file change:
//!     watcher.rs detects change
//!     → new DeploymentConfig
//!     → session swaps state atomically, contract handles rebuilt
//! ```

pub mod abi;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use schema::ClientConfig;
pub use schema::DeploymentConfig;
pub use schema::DocumentSource;
pub use schema::WalletSource;
