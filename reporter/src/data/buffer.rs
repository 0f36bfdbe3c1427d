//! In-memory trace buffer
//!
//! Producers append finished traces under their query signature; the flush
//! scheduler swaps the whole map out in one step. Once the estimated encoded
//! size of the current batch crosses the threshold, the scheduler is woken
//! exactly once for that batch.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use prost::Message;
use tokio::sync::Notify;

use crate::domain::reports::proto;
use crate::domain::reports::{ReportHeader, TraceBatch};
use crate::domain::traces::Trace;

/// Map-entry framing around a signature key (tag, length prefix, entry tag)
const KEY_OVERHEAD_BYTES: usize = 8;

#[derive(Default)]
struct Epoch {
    traces: TraceBatch,
    estimated_bytes: usize,
    trace_count: usize,
    /// Early flush already requested for this epoch
    signalled: bool,
}

pub struct TraceBuffer {
    epoch: Mutex<Epoch>,
    early_flush: Notify,
    max_batch_bytes: usize,
    /// Encoded report header, counted once per non-empty epoch
    header_bytes: usize,
    early_flush_signals: AtomicU64,
}

impl TraceBuffer {
    pub fn new(max_batch_bytes: usize) -> Self {
        Self {
            epoch: Mutex::new(Epoch::default()),
            early_flush: Notify::new(),
            max_batch_bytes,
            header_bytes: 0,
            early_flush_signals: AtomicU64::new(0),
        }
    }

    /// Count the header every report carries towards the size threshold
    pub fn with_header(mut self, header: &ReportHeader) -> Self {
        let header_bytes = proto::ReportHeader::from(header).encoded_len();
        self.header_bytes = header_bytes + prost::length_delimiter_len(header_bytes) + 1;
        self
    }

    /// Append a trace. Returns `true` when this insert requested an early flush.
    pub fn insert(&self, signature: String, trace: &Trace) -> bool {
        let wire = proto::Trace::from(trace);
        let trace_bytes = wire.encoded_len();
        let trace_bytes = trace_bytes + prost::length_delimiter_len(trace_bytes) + 1;

        let (signal, estimated_bytes) = {
            let mut epoch = self.epoch.lock();
            let mut added = trace_bytes;
            if epoch.trace_count == 0 {
                added += self.header_bytes;
            }
            if !epoch.traces.contains_key(&signature) {
                added += signature.len() + KEY_OVERHEAD_BYTES;
            }
            epoch
                .traces
                .entry(signature)
                .or_default()
                .trace
                .push(wire);
            epoch.estimated_bytes += added;
            epoch.trace_count += 1;

            let signal = !epoch.signalled && epoch.estimated_bytes > self.max_batch_bytes;
            if signal {
                epoch.signalled = true;
            }
            (signal, epoch.estimated_bytes)
        };

        if signal {
            self.early_flush_signals.fetch_add(1, Ordering::Relaxed);
            self.early_flush.notify_one();
            tracing::debug!(
                estimated_bytes,
                threshold = self.max_batch_bytes,
                "Trace batch over size threshold, requesting early flush"
            );
        }
        signal
    }

    /// Swap out the current batch and start a fresh epoch
    pub fn take_and_reset(&self) -> TraceBatch {
        let epoch = std::mem::take(&mut *self.epoch.lock());
        epoch.traces
    }

    /// Resolves once an early flush has been requested.
    ///
    /// A request made while nobody is waiting is kept until the next call.
    pub async fn early_flush_requested(&self) {
        self.early_flush.notified().await;
    }

    pub fn should_flush_early(&self) -> bool {
        self.epoch.lock().estimated_bytes > self.max_batch_bytes
    }

    /// Total early-flush requests since creation
    pub fn early_flush_signals(&self) -> u64 {
        self.early_flush_signals.load(Ordering::Relaxed)
    }

    /// Number of buffered traces
    pub fn len(&self) -> usize {
        self.epoch.lock().trace_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn estimated_size(&self) -> usize {
        self.epoch.lock().estimated_bytes
    }

    pub fn max_batch_bytes(&self) -> usize {
        self.max_batch_bytes
    }
}
