//! Executed request -> trace conversion
//!
//! Glues the execution output of one request (tracing extension, errors,
//! request metadata) to the tree builder and produces the [`Trace`] that gets
//! buffered under the request's query signature.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::client::ClientInfo;
use super::collate::sort_timings;
use super::signature::query_signature;
use super::tree::build;
use super::types::{FieldError, FieldTiming, HttpMethod, Trace};
use crate::utils::time::duration_nanos;

/// HTTP status reported for requests that produced errors
pub const STATUS_WITH_ERRORS: u16 = 400;

/// HTTP status reported for clean requests
pub const STATUS_OK: u16 = 200;

/// Resolver section of the tracing extension
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutionPhase {
    #[serde(default)]
    pub resolvers: Vec<FieldTiming>,
}

/// The `tracing` response extension produced by the execution engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTiming {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Zero or missing falls back to `end_time - start_time`
    #[serde(rename = "duration", default)]
    pub duration_nanos: u64,
    #[serde(default)]
    pub execution: ExecutionPhase,
}

/// Everything the reporter needs to know about one executed request
#[derive(Debug, Clone, Default)]
pub struct ExecutedRequest {
    pub query: Option<String>,
    pub operation_name: Option<String>,
    pub client: ClientInfo,
    pub http_method: HttpMethod,
    /// Status written to the client; derived from `errors` when absent
    pub http_status: Option<u16>,
    pub timing: Option<ExecutionTiming>,
    pub errors: Vec<FieldError>,
}

impl ExecutedRequest {
    pub fn signature(&self) -> String {
        query_signature(self.operation_name.as_deref(), self.query.as_deref())
    }
}

/// Build the trace of one request, or `None` when there is nothing to report.
pub fn create_trace(request: ExecutedRequest) -> Option<Trace> {
    let ExecutedRequest {
        client,
        http_method,
        http_status,
        timing,
        errors,
        ..
    } = request;

    let (start_time, end_time, duration_nanos, mut resolvers) = match timing {
        Some(t) => {
            let duration = match t.duration_nanos {
                0 => duration_nanos(t.start_time, t.end_time),
                d => d,
            };
            (t.start_time, t.end_time, duration, t.execution.resolvers)
        }
        None => {
            let now = Utc::now();
            (now, now, 0, Vec::new())
        }
    };

    sort_timings(&mut resolvers);
    let root = build(&resolvers, &errors)?;

    let http_status_code = http_status.unwrap_or(if errors.is_empty() {
        STATUS_OK
    } else {
        STATUS_WITH_ERRORS
    });

    Some(Trace {
        start_time,
        end_time,
        duration_nanos,
        http_method,
        http_status_code,
        client_name: client.name,
        client_version: client.version,
        root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response_path;

    fn tracing_extension() -> ExecutionTiming {
        serde_json::from_value(serde_json::json!({
            "version": 1,
            "startTime": "2024-01-01T00:00:00Z",
            "endTime": "2024-01-01T00:00:00.000500Z",
            "duration": 500000,
            "execution": {
                "resolvers": [
                    {
                        "path": ["hero", "name"],
                        "parentType": "Character",
                        "fieldName": "name",
                        "returnType": "String",
                        "startOffset": 2000,
                        "duration": 100
                    },
                    {
                        "path": ["hero"],
                        "parentType": "Query",
                        "fieldName": "hero",
                        "returnType": "Character",
                        "startOffset": 1000,
                        "duration": 900
                    }
                ]
            }
        }))
        .unwrap()
    }

    fn request() -> ExecutedRequest {
        ExecutedRequest {
            query: Some("query Hero { hero { name } }".to_string()),
            operation_name: Some("Hero".to_string()),
            client: ClientInfo::new("web", "1.0"),
            timing: Some(tracing_extension()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_trace_sorts_resolvers_and_copies_timing() {
        let trace = create_trace(request()).unwrap();

        assert_eq!(trace.root.response_name, "hero");
        assert_eq!(trace.root.children.len(), 1);
        assert_eq!(trace.root.children[0].response_name, "name");
        assert_eq!(trace.duration_nanos, 500_000);
        assert_eq!(trace.end_time - trace.start_time, chrono::Duration::microseconds(500));
        assert_eq!(trace.client_name, "web");
        assert_eq!(trace.client_version, "1.0");
        assert_eq!(trace.http_method, HttpMethod::Post);
        assert_eq!(trace.http_status_code, STATUS_OK);
    }

    #[test]
    fn test_create_trace_status_from_errors() {
        let mut req = request();
        req.errors = vec![FieldError::new("boom").with_path(response_path!["hero", "name"])];

        let trace = create_trace(req).unwrap();

        assert_eq!(trace.http_status_code, STATUS_WITH_ERRORS);
        assert_eq!(trace.root.children[0].errors.len(), 1);
    }

    #[test]
    fn test_create_trace_explicit_status_wins() {
        let mut req = request();
        req.http_status = Some(500);
        req.http_method = HttpMethod::Get;

        let trace = create_trace(req).unwrap();

        assert_eq!(trace.http_status_code, 500);
        assert_eq!(trace.http_method, HttpMethod::Get);
    }

    #[test]
    fn test_create_trace_without_timing_uses_error_shell() {
        let req = ExecutedRequest {
            query: Some("{ hero }".to_string()),
            errors: vec![FieldError::new("Cannot query field").with_location(1, 3)],
            ..Default::default()
        };

        let trace = create_trace(req).unwrap();

        assert_eq!(trace.duration_nanos, 0);
        assert_eq!(trace.start_time, trace.end_time);
        assert_eq!(trace.root.errors.len(), 1);
        assert!(trace.root.children.is_empty());
        assert_eq!(trace.client_name, "Unknown");
    }

    #[test]
    fn test_create_trace_duration_falls_back_to_timestamps() {
        let mut req = request();
        if let Some(timing) = req.timing.as_mut() {
            timing.duration_nanos = 0;
        }

        let trace = create_trace(req).unwrap();

        assert_eq!(trace.duration_nanos, 500_000);
    }

    #[test]
    fn test_create_trace_nothing_to_report() {
        let req = ExecutedRequest {
            query: Some("{ hero }".to_string()),
            ..Default::default()
        };
        assert!(create_trace(req).is_none());
    }

    #[test]
    fn test_signature_uses_operation_name() {
        assert_eq!(request().signature(), "# Hero\nquery Hero { hero { name } }");
    }
}
