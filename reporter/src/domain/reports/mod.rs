//! Report assembly and delivery scheduling
//!
//! - `proto` - Wire messages (`reports.proto` subset)
//! - `header` - Process and schema identification
//! - `pipeline` - Background flush loop

pub mod header;
pub mod pipeline;
pub mod proto;

use std::collections::HashMap;

use chrono::Utc;

pub use header::{ReportHeader, ReportHeaderBuilder};
pub use pipeline::FlushScheduler;

use crate::utils::time::to_proto_timestamp;

/// Traces keyed by query signature, as drained from the buffer
pub type TraceBatch = HashMap<String, proto::TracesAndStats>;

/// Wrap a drained batch into a report stamped with the current time
pub fn build_report(header: &ReportHeader, batch: TraceBatch) -> proto::Report {
    proto::Report {
        header: Some(header.into()),
        end_time: Some(to_proto_timestamp(Utc::now())),
        traces_per_query: batch,
    }
}
