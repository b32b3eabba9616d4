use std::time::Duration;

use tokio::time::sleep;

use crate::shutdown::{ShutdownReceiver, ShutdownSender, shutdown_channel};

/// Run-scoped cancellation signal shared by the dispatcher, workers and
/// collector.
///
/// Receivers must be taken with [`Cancellation::subscribe`] before the
/// owning task is spawned so that no participant can miss the signal.
#[derive(Clone)]
pub(super) struct Cancellation {
    shutdown_tx: ShutdownSender,
}

impl Cancellation {
    pub(super) fn new() -> Self {
        let (shutdown_tx, _) = shutdown_channel();
        Self { shutdown_tx }
    }

    pub(super) fn subscribe(&self) -> ShutdownReceiver {
        self.shutdown_tx.subscribe()
    }

    /// Raises the signal. Safe to call any number of times.
    pub(super) fn cancel(&self) {
        // Fails only when every participant already exited.
        drop(self.shutdown_tx.send(()));
    }
}

/// Resolves when the caller's deadline elapses; never resolves without one.
pub(super) async fn deadline_elapsed(deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => sleep(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
