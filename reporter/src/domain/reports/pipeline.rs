//! Flush scheduler
//!
//! A single background task drains the trace buffer and hands each batch to
//! the exporter. A flush runs when the interval elapses, when the buffer asks
//! for an early flush, and one last time when shutdown is requested. Exports
//! never overlap; a failed export is logged and its batch is dropped.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use super::header::ReportHeader;
use super::{build_report, proto};
use crate::data::buffer::TraceBuffer;
use crate::data::export::{ExportError, ReportExporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushReason {
    Interval,
    EarlyFlush,
    Shutdown,
    Manual,
}

impl fmt::Display for FlushReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushReason::Interval => write!(f, "interval"),
            FlushReason::EarlyFlush => write!(f, "size"),
            FlushReason::Shutdown => write!(f, "shutdown"),
            FlushReason::Manual => write!(f, "manual"),
        }
    }
}

pub struct FlushScheduler {
    buffer: Arc<TraceBuffer>,
    exporter: Arc<dyn ReportExporter>,
    header: ReportHeader,
    flush_interval: Duration,
    shutdown_timeout: Duration,
    /// Held for the duration of an export
    export_lock: Mutex<()>,
}

impl FlushScheduler {
    pub fn new(
        buffer: Arc<TraceBuffer>,
        exporter: Arc<dyn ReportExporter>,
        header: ReportHeader,
        flush_interval: Duration,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            buffer,
            exporter,
            header,
            flush_interval,
            shutdown_timeout,
            export_lock: Mutex::new(()),
        }
    }

    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    /// Start the flush loop.
    ///
    /// The loop exits after the final flush once `shutdown_rx` turns `true` or
    /// its sender is dropped.
    pub fn start(self: Arc<Self>, mut shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::debug!(
                exporter = self.exporter.name(),
                interval_secs = self.flush_interval.as_secs(),
                max_batch_bytes = self.buffer.max_batch_bytes(),
                "Trace reporter started"
            );

            loop {
                let reason = tokio::select! {
                    biased;
                    _ = wait_for_shutdown(&mut shutdown_rx) => FlushReason::Shutdown,
                    _ = self.buffer.early_flush_requested() => FlushReason::EarlyFlush,
                    _ = tokio::time::sleep(self.flush_interval) => FlushReason::Interval,
                };

                self.flush(reason, &mut shutdown_rx).await;

                if reason == FlushReason::Shutdown {
                    break;
                }
            }

            tracing::debug!("Trace reporter flush loop finished");
        })
    }

    /// Flush whatever is buffered right now, waiting for any export in progress
    pub async fn flush_now(&self) -> Result<(), ExportError> {
        let _guard = self.export_lock.lock().await;
        match self.take_report(FlushReason::Manual) {
            Some(report) => self.exporter.export(report).await,
            None => Ok(()),
        }
    }

    async fn flush(&self, reason: FlushReason, shutdown_rx: &mut watch::Receiver<bool>) {
        let _guard = self.export_lock.lock().await;
        let Some(report) = self.take_report(reason) else {
            return;
        };

        let export = self.exporter.export(report);
        tokio::pin!(export);

        let outcome = if reason == FlushReason::Shutdown {
            tokio::time::timeout(self.shutdown_timeout, &mut export).await
        } else {
            tokio::select! {
                result = &mut export => Ok(result),
                _ = wait_for_shutdown(shutdown_rx) => {
                    tracing::debug!(
                        grace_secs = self.shutdown_timeout.as_secs(),
                        "Shutdown requested during export, waiting for it to finish"
                    );
                    tokio::time::timeout(self.shutdown_timeout, &mut export).await
                }
            }
        };

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    remote = e.is_remote(),
                    exporter = self.exporter.name(),
                    reason = %reason,
                    "Failed to send trace report, batch dropped"
                );
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.shutdown_timeout.as_secs(),
                    exporter = self.exporter.name(),
                    "Trace report export timed out during shutdown, batch dropped"
                );
            }
        }
    }

    fn take_report(&self, reason: FlushReason) -> Option<proto::Report> {
        let batch = self.buffer.take_and_reset();
        if batch.is_empty() {
            tracing::trace!(reason = %reason, "Nothing to flush");
            return None;
        }

        let traces: usize = batch.values().map(|t| t.trace.len()).sum();
        tracing::debug!(
            reason = %reason,
            signatures = batch.len(),
            traces,
            "Flushing trace report"
        );
        Some(build_report(&self.header, batch))
    }
}

async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|&v| v).await;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
