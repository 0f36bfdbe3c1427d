//! Report delivery
//!
//! The flush scheduler talks to an exporter through [`ReportExporter`] so the
//! ingress client can be swapped for a recording one in tests.

mod error;
mod http;

use async_trait::async_trait;

pub use error::ExportError;
pub use http::{HttpReportExporter, encode_report};

use crate::domain::reports::proto::Report;

#[async_trait]
pub trait ReportExporter: Send + Sync {
    /// Deliver one report. Failures are final; the caller does not retry.
    async fn export(&self, report: Report) -> Result<(), ExportError>;

    /// Human-readable exporter name
    fn name(&self) -> &'static str;
}
