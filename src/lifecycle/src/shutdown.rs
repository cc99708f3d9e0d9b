//! Graceful shutdown coordination (spec §4.7): stop accepting new
//! requests, drain in-flight work for a bounded window, cancel background
//! tasks, then let the caller close the datastore and exit.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    drain_timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(drain_timeout: Duration) -> Self {
        Self { token: CancellationToken::new(), drain_timeout }
    }

    /// A child token for a background task: cancelling it doesn't cancel
    /// the parent, but the parent cancelling it does cancel the child.
    pub fn task_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    /// Resolves on ctrl-c or SIGTERM, whichever arrives first, and fires
    /// the token so every listener/ticker holding a child token begins
    /// shutting down.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };

        #[cfg(unix)]
        let terminate = async {
            let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
            sigterm.recv().await;
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("ctrl-c received, shutting down"),
            _ = terminate => tracing::info!("sigterm received, shutting down"),
        }

        self.token.cancel();
    }

    /// For callers (tests, `--once` style tools) that want to trigger
    /// shutdown programmatically instead of waiting on a signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
