//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers shutdown. A second Ctrl-C exits immediately.

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task that turns Ctrl-C into a shutdown trigger.
pub fn spawn_ctrl_c_handler(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Unable to listen for Ctrl-C");
            return;
        }
        tracing::info!("Ctrl-C received, shutting down");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second Ctrl-C, exiting now");
            std::process::exit(130);
        }
    })
}
