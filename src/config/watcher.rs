//! Deployment document watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{parse_deployment, ConfigError};
use crate::config::schema::DeploymentConfig;

/// Watches a file-based deployment document for changes.
pub struct DeploymentWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<DeploymentConfig>,
}

impl DeploymentWatcher {
    /// Create a new DeploymentWatcher.
    ///
    /// Returns the watcher and a receiver for parsed documents.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<DeploymentConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            update_tx,
        }, update_rx)
    }

    /// Start watching the file. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Deployment document change detected, reloading...");
                        match read_deployment(&path) {
                            Ok(deployment) => {
                                let _ = tx.send(deployment);
                            }
                            Err(e) => {
                                tracing::error!("Failed to reload deployment document: {}. Keeping current state.", e);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Deployment watcher started");
        Ok(watcher)
    }
}

fn read_deployment(path: &Path) -> Result<DeploymentConfig, ConfigError> {
    let body = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_deployment(&body)
}
