//! Fire-and-forget restart scheduling.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{RestartController, RestartOutcome};

/// Starts a restart without blocking the caller.
pub trait RestartScheduler: Send + Sync {
    fn schedule(&self);
}

/// Completion signal of one scheduled restart. Dropping it is the normal
/// case: the session does not wait on restarts.
#[derive(Debug)]
pub struct RestartTicket {
    done: oneshot::Receiver<Option<RestartOutcome>>,
}

impl RestartTicket {
    /// `None` if the restart was cancelled or its task panicked.
    pub async fn wait(self) -> Option<RestartOutcome> {
        self.done.await.ok().flatten()
    }
}

/// Runs each restart as its own task on a tokio runtime.
///
/// Every task gets a child of `cancel`. Nothing cancels it today; at
/// shutdown the runtime is dropped without joining in-flight restarts.
#[derive(Debug, Clone)]
pub struct TokioRestartScheduler {
    handle: Handle,
    controller: Arc<RestartController>,
    cancel: CancellationToken,
}

impl TokioRestartScheduler {
    pub fn new(handle: Handle, controller: Arc<RestartController>) -> Self {
        Self {
            handle,
            controller,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn spawn(&self) -> RestartTicket {
        let (done_tx, done_rx) = oneshot::channel();
        let controller = Arc::clone(&self.controller);
        let cancel = self.cancel.child_token();

        self.handle.spawn(async move {
            let work = tokio::task::spawn_blocking(move || controller.restart_blocking());
            let outcome = tokio::select! {
                _ = cancel.cancelled() => None,
                joined = work => joined.ok(),
            };
            debug!(?outcome, "restart task finished");
            let _ = done_tx.send(outcome);
        });

        RestartTicket { done: done_rx }
    }
}

impl RestartScheduler for TokioRestartScheduler {
    fn schedule(&self) {
        // The ticket is dropped: no result flows back to the session.
        let _ = self.spawn();
    }
}
