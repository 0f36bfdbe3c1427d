//! # Studio Reporter
//!
//! Per-field execution traces for a GraphQL server, batched by query signature
//! and shipped to the Apollo Studio trace ingress.
//!
//! Request handlers hand each executed request to [`TraceReporter::record`].
//! The request's flat resolver timings are rebuilt into a tree shaped like the
//! response, buffered under the query's signature, and flushed in the
//! background every 20 seconds, or sooner once the batch approaches 2 MiB.
//!
//! ```no_run
//! use studio_reporter::{ReportHeader, ReporterConfig, TraceReporter};
//!
//! # async fn run() -> anyhow::Result<()> {
//! TraceReporter::init_logging();
//! let config = ReporterConfig::load()?;
//! let header = ReportHeader::builder().schema("type Query { hero: String }").build();
//! let reporter = TraceReporter::new(&config, header)?;
//! let handle = reporter.start();
//!
//! // ... serve requests, calling reporter.record(...) for each ...
//!
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

pub use app::TraceReporter;
pub use crate::core::{ReporterConfig, ReporterHandle};
pub use data::{ExportError, HttpReportExporter, ReportExporter, TraceBuffer};
pub use domain::reports::{ReportHeader, proto};
pub use domain::traces::{
    ClientInfo, ExecutedRequest, ExecutionTiming, FieldError, FieldTiming, HttpMethod,
    PathSegment, Trace, TraceNode,
};
