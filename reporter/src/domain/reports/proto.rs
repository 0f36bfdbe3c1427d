//! Report wire format
//!
//! Hand-written `prost` messages for the subset of Apollo's `reports.proto`
//! this reporter produces. Tag numbers match the upstream schema; fields the
//! reporter never sets are left out and stay wire compatible.

#![allow(clippy::derive_partial_eq_without_eq)]

use std::collections::HashMap;

use crate::domain::traces::types::{self as domain, HttpMethod};
use crate::utils::time::to_proto_timestamp;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReportHeader {
    #[prost(string, tag = "5")]
    pub hostname: String,
    #[prost(string, tag = "6")]
    pub agent_version: String,
    #[prost(string, tag = "7")]
    pub service_version: String,
    #[prost(string, tag = "8")]
    pub runtime_version: String,
    #[prost(string, tag = "9")]
    pub uname: String,
    #[prost(string, tag = "11")]
    pub executable_schema_id: String,
    #[prost(string, tag = "12")]
    pub graph_ref: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Report {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ReportHeader>,
    #[prost(message, optional, tag = "2")]
    pub end_time: Option<::prost_types::Timestamp>,
    #[prost(map = "string, message", tag = "5")]
    pub traces_per_query: HashMap<String, TracesAndStats>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TracesAndStats {
    #[prost(message, repeated, tag = "1")]
    pub trace: Vec<Trace>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Trace {
    #[prost(message, optional, tag = "3")]
    pub end_time: Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub start_time: Option<::prost_types::Timestamp>,
    #[prost(string, tag = "7")]
    pub client_name: String,
    #[prost(string, tag = "8")]
    pub client_version: String,
    #[prost(message, optional, tag = "10")]
    pub http: Option<trace::Http>,
    #[prost(uint64, tag = "11")]
    pub duration_ns: u64,
    #[prost(message, optional, tag = "14")]
    pub root: Option<trace::Node>,
}

/// Nested messages of [`Trace`]
pub mod trace {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Location {
        #[prost(uint32, tag = "1")]
        pub line: u32,
        #[prost(uint32, tag = "2")]
        pub column: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Error {
        #[prost(string, tag = "1")]
        pub message: String,
        #[prost(message, repeated, tag = "2")]
        pub location: Vec<Location>,
        #[prost(string, tag = "4")]
        pub json: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Http {
        #[prost(enumeration = "http::Method", tag = "1")]
        pub method: i32,
        #[prost(uint32, tag = "6")]
        pub status_code: u32,
    }

    pub mod http {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Method {
            Unknown = 0,
            Options = 1,
            Get = 2,
            Head = 3,
            Post = 4,
            Put = 5,
            Delete = 6,
            Trace = 7,
            Connect = 8,
            Patch = 9,
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Node {
        #[prost(string, tag = "3")]
        pub r#type: String,
        #[prost(uint64, tag = "8")]
        pub start_time: u64,
        #[prost(uint64, tag = "9")]
        pub end_time: u64,
        #[prost(message, repeated, tag = "11")]
        pub error: Vec<Error>,
        #[prost(message, repeated, tag = "12")]
        pub child: Vec<Node>,
        #[prost(string, tag = "13")]
        pub parent_type: String,
        #[prost(oneof = "node::Id", tags = "1, 2")]
        pub id: Option<node::Id>,
    }

    pub mod node {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Id {
            #[prost(string, tag = "1")]
            ResponseName(String),
            #[prost(uint32, tag = "2")]
            Index(u32),
        }
    }
}

// ============================================================================
// DOMAIN -> WIRE
// ============================================================================

impl From<HttpMethod> for trace::http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Unknown => Self::Unknown,
            HttpMethod::Options => Self::Options,
            HttpMethod::Get => Self::Get,
            HttpMethod::Head => Self::Head,
            HttpMethod::Post => Self::Post,
            HttpMethod::Put => Self::Put,
            HttpMethod::Delete => Self::Delete,
            HttpMethod::Trace => Self::Trace,
            HttpMethod::Connect => Self::Connect,
            HttpMethod::Patch => Self::Patch,
        }
    }
}

impl From<&domain::TraceError> for trace::Error {
    fn from(error: &domain::TraceError) -> Self {
        Self {
            message: error.message.clone(),
            location: error
                .locations
                .iter()
                .map(|l| trace::Location {
                    line: l.line,
                    column: l.column,
                })
                .collect(),
            json: error.json.clone(),
        }
    }
}

impl From<&domain::TraceNode> for trace::Node {
    fn from(node: &domain::TraceNode) -> Self {
        let id = match node.array_index {
            Some(index) => trace::node::Id::Index(index),
            None => trace::node::Id::ResponseName(node.response_name.clone()),
        };
        Self {
            r#type: node.type_name.clone(),
            start_time: node.start_offset_nanos,
            end_time: node.end_offset_nanos,
            error: node.errors.iter().map(trace::Error::from).collect(),
            child: node.children.iter().map(trace::Node::from).collect(),
            parent_type: node.parent_type.clone(),
            id: Some(id),
        }
    }
}

impl From<&domain::Trace> for Trace {
    fn from(trace: &domain::Trace) -> Self {
        Self {
            end_time: Some(to_proto_timestamp(trace.end_time)),
            start_time: Some(to_proto_timestamp(trace.start_time)),
            client_name: trace.client_name.clone(),
            client_version: trace.client_version.clone(),
            http: Some(trace::Http {
                method: trace::http::Method::from(trace.http_method) as i32,
                status_code: u32::from(trace.http_status_code),
            }),
            duration_ns: trace.duration_nanos,
            root: Some(trace::Node::from(&trace.root)),
        }
    }
}
