//! Pending Timer Module
//!
//! Deferred actions that can be revoked before they fire.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// == Pending Timer ==
/// A delayed action running on the tokio runtime.
///
/// Cancelling is idempotent and a no-op once the action has already fired.
#[derive(Debug)]
pub struct PendingTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PendingTimer {
    /// Runs `action` after `delay` unless cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(delay: Duration, action: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let guard = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => action.await,
            }
        });

        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the timer either fired or observed its cancellation.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// == Start Timers ==
/// Countdown scheduled while a match waits to start: the start itself plus
/// the alerts that precede it.
#[derive(Debug)]
pub struct StartTimers {
    pub start: PendingTimer,
    pub alerts: Vec<PendingTimer>,
}

impl StartTimers {
    pub fn new(start: PendingTimer, alerts: Vec<PendingTimer>) -> Self {
        Self { start, alerts }
    }

    /// Cancels the start timer and every alert.
    pub fn cancel_all(&self) {
        self.start.cancel();
        for alert in &self.alerts {
            alert.cancel();
        }
    }

    pub fn all_cancelled(&self) -> bool {
        self.start.is_cancelled() && self.alerts.iter().all(PendingTimer::is_cancelled)
    }
}
