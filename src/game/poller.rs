//! Periodic state refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::config::schema::DeploymentConfig;
use crate::game::session::{Session, Snapshot};

/// Re-runs [`Session::refresh`] on a fixed interval and publishes snapshots.
///
/// Deployment reloads arriving on `reloads` are adopted between refreshes.
/// The loop ends when shutdown fires or every snapshot receiver is gone.
pub struct StatePoller {
    session: Arc<Session>,
    interval: Duration,
    shutdown: broadcast::Receiver<()>,
    reloads: Option<mpsc::UnboundedReceiver<DeploymentConfig>>,
    tx: watch::Sender<Option<Snapshot>>,
}

impl StatePoller {
    /// Create a poller and the receiver its snapshots go to.
    pub fn new(
        session: Arc<Session>,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, watch::Receiver<Option<Snapshot>>) {
        let interval = Duration::from_millis(session.config().polling.interval_ms);
        let (tx, rx) = watch::channel(None);
        (
            Self {
                session,
                interval,
                shutdown,
                reloads: None,
                tx,
            },
            rx,
        )
    }

    /// Feed deployment document reloads into the loop.
    pub fn with_reloads(mut self, reloads: mpsc::UnboundedReceiver<DeploymentConfig>) -> Self {
        self.reloads = Some(reloads);
        self
    }

    /// Run the poll loop.
    pub async fn run(mut self) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Starting state poller");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("State poller stopped");
                    break;
                }
                Some(deployment) = recv_reload(&mut self.reloads) => {
                    if let Err(e) = self.session.apply_deployment(deployment).await {
                        tracing::error!(error = %e, "Rejected reloaded deployment document");
                    }
                    ticker.reset_immediately();
                }
                _ = ticker.tick() => {
                    if !self.poll().await {
                        tracing::info!("No snapshot subscribers left, stopping poller");
                        break;
                    }
                }
            }
        }
    }

    /// One refresh. Returns false once nobody listens.
    async fn poll(&self) -> bool {
        match self.session.refresh().await {
            Ok(snapshot) => self.tx.send(Some(snapshot)).is_ok(),
            Err(e) => {
                tracing::error!(error = %e, "Error refreshing game state");
                !self.tx.is_closed()
            }
        }
    }
}

async fn recv_reload(
    reloads: &mut Option<mpsc::UnboundedReceiver<DeploymentConfig>>,
) -> Option<DeploymentConfig> {
    match reloads {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
