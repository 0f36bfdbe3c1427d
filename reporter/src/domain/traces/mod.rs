//! Trace reconstruction
//!
//! - `types` - Execution records in, trace tree out
//! - `collate` - Sorts resolver timings into subtree order
//! - `tree` - Rebuilds the response-shaped tree from sorted timings
//! - `signature` - Query signature used as the buffering key
//! - `client` - Client name/version from request headers
//! - `convert` - One executed request to one [`Trace`]

pub mod client;
pub mod collate;
pub mod convert;
pub mod signature;
pub mod tree;
pub mod types;

pub use client::ClientInfo;
pub use collate::sort_timings;
pub use convert::{ExecutedRequest, ExecutionPhase, ExecutionTiming, create_trace};
pub use signature::query_signature;
pub use tree::build;
pub use types::{
    ErrorLocation, FieldError, FieldTiming, HttpMethod, PathSegment, ResponsePath, Trace,
    TraceError, TraceNode,
};
