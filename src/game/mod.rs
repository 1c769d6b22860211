//! Commit-reveal game logic.
//!
//! # Data Flow
//! ```text
//! Session (deployment + contract handles + account)
//!     → phase.rs      isSetup / revealBlock / height / adminSecret → GamePhase
//!     → dispatcher.rs commit (nftPrice → estimate → send), mint (estimate → send)
//!     → tokens.rs     id_count → balanceOfBatch → owned ids; event history
//!
//! poller.rs ── interval ──┐
//!                         ├──▶ Session::refresh ──▶ Snapshot
//! commit / mint settle ───┘
//! ```

pub mod dispatcher;
pub mod gateway;
pub mod phase;
pub mod poller;
pub mod session;
pub mod tokens;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use gateway::{ContractHandles, MintGateway};
pub use phase::{read_phase, resolve_phase};
pub use poller::StatePoller;
pub use session::{Session, Snapshot};
pub use types::{ActionReceipt, CommitEvent, GamePhase, MintAction, MintEvent, PhaseInputs};
