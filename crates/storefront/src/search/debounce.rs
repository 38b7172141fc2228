//! Cancellable timers on the Tokio runtime.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a scheduled callback. Dropping it does not cancel the callback.
#[derive(Debug)]
pub struct CancelHandle {
    task: JoinHandle<()>,
}

impl CancelHandle {
    /// Stop the callback if it has not run yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the callback ran or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run `f` once `delay` has elapsed.
///
/// Must be called from within a Tokio runtime.
pub fn schedule_after<F>(delay: Duration, f: F) -> CancelHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    });
    CancelHandle { task }
}

/// At most one pending callback; scheduling a new one cancels the previous.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<CancelHandle>,
}

impl Debouncer {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Cancel the pending callback and schedule `f` after `delay`.
    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(schedule_after(delay, f));
    }

    /// Cancel the pending callback, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    /// Whether a callback is still waiting to run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
