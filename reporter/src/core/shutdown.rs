//! Reporter shutdown handle

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the background flush task.
///
/// [`ReporterHandle::shutdown`] signals the task, which performs one final
/// flush bounded by the shutdown timeout before exiting.
#[derive(Debug)]
pub struct ReporterHandle {
    tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    timeout: Duration,
}

impl ReporterHandle {
    pub fn new(tx: watch::Sender<bool>, handle: JoinHandle<()>, timeout: Duration) -> Self {
        Self {
            tx,
            handle,
            timeout,
        }
    }

    /// Subscribe to the shutdown signal
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Signal shutdown without waiting
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Trigger shutdown and wait for the final flush.
    ///
    /// Waits at most twice the shutdown timeout: once for an in-flight export
    /// and once for the final one. The task is aborted past that.
    pub async fn shutdown(self) {
        tracing::debug!("Stopping trace reporter...");
        self.trigger();

        let mut handle = self.handle;
        let deadline = self.timeout * 2;
        match tokio::time::timeout(deadline, &mut handle).await {
            Ok(Ok(())) => tracing::debug!("Trace reporter stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Trace reporter task failed"),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = deadline.as_secs(),
                    "Timeout waiting for trace reporter, aborting"
                );
                handle.abort();
            }
        }
    }
}
