//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load settings → Validate → Build session → Start poller/watcher
//!
//! Shutdown (shutdown.rs):
//!     Signal received → poller and watcher exit → session dropped
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
