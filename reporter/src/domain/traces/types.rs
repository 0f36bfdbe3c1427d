//! Trace data model
//!
//! Input records ([`FieldTiming`], [`FieldError`]) arrive from the execution
//! engine in the shape of the Apollo tracing extension. Output records
//! ([`TraceNode`], [`Trace`]) mirror the response tree and are converted to the
//! report wire format at flush time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// RESPONSE PATHS
// ============================================================================

/// One segment of a response path: a field name or a list index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(u32),
    Field(String),
}

impl PathSegment {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Field(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Field(name) => f.write_str(name),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<u32> for PathSegment {
    fn from(index: u32) -> Self {
        Self::Index(index)
    }
}

/// Unsuffixed integer literals land here. Negative values are not list
/// positions and are kept verbatim as a field segment.
impl From<i32> for PathSegment {
    fn from(index: i32) -> Self {
        u32::try_from(index)
            .map(Self::Index)
            .unwrap_or_else(|_| Self::Field(index.to_string()))
    }
}

/// Position of a field in the response tree, e.g. `["hero", 0, "name"]`
pub type ResponsePath = Vec<PathSegment>;

/// Build a [`ResponsePath`] from mixed field names and indices.
///
/// ```
/// use studio_reporter::response_path;
/// let path = response_path!["hero", 0, "name"];
/// assert_eq!(path.len(), 3);
/// ```
#[macro_export]
macro_rules! response_path {
    ($($segment:expr),* $(,)?) => {
        vec![$($crate::PathSegment::from($segment)),*]
    };
}

// ============================================================================
// EXECUTION RECORDS (input)
// ============================================================================

/// Timing of a single resolver execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTiming {
    pub path: ResponsePath,
    pub parent_type: String,
    pub field_name: String,
    pub return_type: String,
    /// Nanoseconds from the start of the request
    #[serde(rename = "startOffset")]
    pub start_offset_nanos: u64,
    #[serde(rename = "duration")]
    pub duration_nanos: u64,
}

/// Line/column of the query text an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// An execution error as reported in the GraphQL response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ResponsePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: None,
        }
    }

    pub fn with_path(mut self, path: ResponsePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.locations.push(ErrorLocation { line, column });
        self
    }

    /// Errors without a path, or with a single-segment path, belong to the root
    pub fn is_top_level(&self) -> bool {
        self.path.as_ref().is_none_or(|p| p.len() <= 1)
    }

    /// Error path equals `path` exactly
    pub fn is_at(&self, path: &[PathSegment]) -> bool {
        self.path.as_deref() == Some(path)
    }

    /// Error path is a strict descendant of `path`
    pub fn is_beneath(&self, path: &[PathSegment]) -> bool {
        self.path
            .as_ref()
            .is_some_and(|p| p.len() > path.len() && p.starts_with(path))
    }
}

// ============================================================================
// TRACE TREE (output)
// ============================================================================

/// Error attached to a trace node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceError {
    pub message: String,
    /// The full error serialized as JSON
    pub json: String,
    pub locations: Vec<ErrorLocation>,
}

impl From<&FieldError> for TraceError {
    fn from(error: &FieldError) -> Self {
        let json = serde_json::to_string(error).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to serialize execution error");
            String::new()
        });
        Self {
            message: error.message.clone(),
            json,
            locations: error.locations.clone(),
        }
    }
}

/// One node of the reconstructed response tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceNode {
    pub response_name: String,
    pub parent_type: String,
    pub type_name: String,
    pub start_offset_nanos: u64,
    pub end_offset_nanos: u64,
    /// Set only on synthetic list-element nodes
    pub array_index: Option<u32>,
    pub errors: Vec<TraceError>,
    pub children: Vec<TraceNode>,
}

impl TraceNode {
    /// Node for a resolved field
    pub fn for_resolver<'a>(
        timing: &FieldTiming,
        errors: impl IntoIterator<Item = &'a FieldError>,
    ) -> Self {
        Self {
            response_name: timing.field_name.clone(),
            parent_type: timing.parent_type.clone(),
            type_name: timing.return_type.clone(),
            start_offset_nanos: timing.start_offset_nanos,
            end_offset_nanos: timing
                .start_offset_nanos
                .saturating_add(timing.duration_nanos),
            errors: errors.into_iter().map(TraceError::from).collect(),
            ..Self::default()
        }
    }

    /// Synthetic node for one element of a list-typed field
    pub fn for_list_element(index: u32, list_type: &str, element_type: String) -> Self {
        Self {
            parent_type: list_type.to_string(),
            type_name: element_type,
            array_index: Some(index),
            ..Self::default()
        }
    }

    /// Childless root that only carries errors
    pub fn error_shell<'a>(errors: impl IntoIterator<Item = &'a FieldError>) -> Self {
        Self {
            errors: errors.into_iter().map(TraceError::from).collect(),
            ..Self::default()
        }
    }

    /// Number of levels in this subtree, counting this node
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TraceNode::depth).max().unwrap_or(0)
    }

    /// Number of nodes in this subtree, counting this node
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TraceNode::node_count).sum::<usize>()
    }
}

/// HTTP method of the traced request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Unknown,
    Options,
    Get,
    Head,
    #[default]
    Post,
    Put,
    Delete,
    Trace,
    Connect,
    Patch,
}

impl HttpMethod {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "OPTIONS" => Self::Options,
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "TRACE" => Self::Trace,
            "CONNECT" => Self::Connect,
            "PATCH" => Self::Patch,
            _ => Self::Unknown,
        }
    }
}

/// One request's complete trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_nanos: u64,
    pub http_method: HttpMethod,
    pub http_status_code: u16,
    pub client_name: String,
    pub client_version: String,
    pub root: TraceNode,
}
