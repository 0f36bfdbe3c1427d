use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use prost::Message;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue};

use super::{ExportError, ReportExporter};
use crate::domain::reports::proto::Report;

const API_KEY_HEADER: &str = "X-Api-Key";
const PROTOBUF_CONTENT_TYPE: &str = "application/protobuf";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Posts gzip-compressed protobuf reports to the ingress endpoint
#[derive(Debug)]
pub struct HttpReportExporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReportExporter {
    pub fn new(endpoint: String, api_key: &str, timeout: Duration) -> Result<Self, ExportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|e| ExportError::Config(format!("invalid API key: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ExportError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            endpoint = %endpoint,
            timeout_secs = timeout.as_secs(),
            "Report exporter initialized"
        );
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ReportExporter for HttpReportExporter {
    async fn export(&self, report: Report) -> Result<(), ExportError> {
        let body = encode_report(&report)?;
        let compressed_bytes = body.len();

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
            .header(CONTENT_ENCODING, "gzip")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: String = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(ExportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            status = status.as_u16(),
            compressed_bytes,
            "Report delivered"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Serialize a report and gzip it with the fastest compression level
pub fn encode_report(report: &Report) -> Result<Vec<u8>, ExportError> {
    let raw = report.encode_to_vec();
    let mut encoder = GzEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::fast());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}
