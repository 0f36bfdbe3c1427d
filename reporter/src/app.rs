//! Reporter facade

use std::sync::Arc;

use tokio::sync::watch;

use crate::core::config::ReporterConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ReporterHandle;
use crate::data::buffer::TraceBuffer;
use crate::data::export::{ExportError, HttpReportExporter, ReportExporter};
use crate::domain::reports::{FlushScheduler, ReportHeader};
use crate::domain::traces::{ExecutedRequest, create_trace};

/// Entry point for request handlers.
///
/// Cheap to clone; every clone feeds the same buffer. Call [`TraceReporter::start`]
/// once to launch the background flush loop.
#[derive(Clone)]
pub struct TraceReporter {
    buffer: Arc<TraceBuffer>,
    scheduler: Arc<FlushScheduler>,
    shutdown_timeout: std::time::Duration,
}

impl TraceReporter {
    /// Reporter posting to the configured ingress endpoint
    pub fn new(config: &ReporterConfig, header: ReportHeader) -> Result<Self, ExportError> {
        let exporter = HttpReportExporter::new(
            config.endpoint.clone(),
            &config.api_key,
            config.request_timeout,
        )?;
        Ok(Self::with_exporter(config, header, Arc::new(exporter)))
    }

    /// Reporter delivering through a custom exporter.
    ///
    /// A header without a graph reference takes the one from `config`.
    pub fn with_exporter(
        config: &ReporterConfig,
        header: ReportHeader,
        exporter: Arc<dyn ReportExporter>,
    ) -> Self {
        let header = if header.graph_ref.is_empty() {
            ReportHeader {
                graph_ref: config.graph_ref.clone(),
                ..header
            }
        } else {
            header
        };
        let buffer = Arc::new(TraceBuffer::new(config.max_batch_bytes).with_header(&header));
        let scheduler = Arc::new(FlushScheduler::new(
            Arc::clone(&buffer),
            exporter,
            header,
            config.flush_interval,
            config.shutdown_timeout,
        ));
        Self {
            buffer,
            scheduler,
            shutdown_timeout: config.shutdown_timeout,
        }
    }

    /// Launch the background flush loop
    pub fn start(&self) -> ReporterHandle {
        let (tx, rx) = watch::channel(false);
        let handle = Arc::clone(&self.scheduler).start(rx);
        ReporterHandle::new(tx, handle, self.shutdown_timeout)
    }

    /// Convert an executed request into a trace and buffer it.
    ///
    /// Returns `false` when the request produced nothing worth reporting.
    pub fn record(&self, request: ExecutedRequest) -> bool {
        let signature = request.signature();
        let Some(trace) = create_trace(request) else {
            tracing::trace!(signature = %signature, "No trace produced for request");
            return false;
        };
        self.buffer.insert(signature, &trace);
        true
    }

    /// Export everything buffered so far
    pub async fn flush(&self) -> Result<(), ExportError> {
        self.scheduler.flush_now().await
    }

    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    pub fn header(&self) -> &ReportHeader {
        self.scheduler.header()
    }

    /// Install the default `tracing` subscriber.
    ///
    /// Filter comes from `STUDIO_REPORTER_LOG`, then `RUST_LOG`. Does nothing
    /// if the host application already installed a subscriber.
    pub fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        let _ = tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .try_init();
    }
}
