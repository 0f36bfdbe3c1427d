//! Data layer
//!
//! - `buffer` - Signature-keyed trace buffer shared by producers and the flusher
//! - `export` - Report delivery to the ingress endpoint

pub mod buffer;
pub mod export;

pub use buffer::TraceBuffer;
pub use export::{ExportError, HttpReportExporter, ReportExporter};
