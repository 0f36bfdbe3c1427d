//! Domain logic for GraphQL trace reporting
//!
//! - `traces` - Per-request trace reconstruction
//! - `reports` - Report assembly, wire format and the flush scheduler

pub mod reports;
pub mod traces;

pub use reports::{FlushScheduler, ReportHeader};
pub use traces::{ExecutedRequest, Trace, TraceNode};
