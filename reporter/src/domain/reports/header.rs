//! Report header
//!
//! Identifies the reporting process and the schema it serves. Built once at
//! startup and attached to every report.

use crate::core::constants::{ENV_HOSTNAME, ENV_WEBSITE_HOSTNAME, UNKNOWN_HOSTNAME};
use crate::utils::crypto::sha256_hex;

use super::proto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub hostname: String,
    pub agent_version: String,
    pub service_version: String,
    pub runtime_version: String,
    pub uname: String,
    pub graph_ref: String,
    /// SHA-256 (hex) of the executable schema SDL
    pub executable_schema_id: String,
}

impl Default for ReportHeader {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ReportHeader {
    pub fn builder() -> ReportHeaderBuilder {
        ReportHeaderBuilder::default()
    }
}

impl From<&ReportHeader> for proto::ReportHeader {
    fn from(header: &ReportHeader) -> Self {
        Self {
            hostname: header.hostname.clone(),
            agent_version: header.agent_version.clone(),
            service_version: header.service_version.clone(),
            runtime_version: header.runtime_version.clone(),
            uname: header.uname.clone(),
            executable_schema_id: header.executable_schema_id.clone(),
            graph_ref: header.graph_ref.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReportHeaderBuilder {
    hostname: Option<String>,
    service_version: Option<String>,
    runtime_version: Option<String>,
    graph_ref: Option<String>,
    executable_schema_id: Option<String>,
}

impl ReportHeaderBuilder {
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    pub fn graph_ref(mut self, graph_ref: impl Into<String>) -> Self {
        self.graph_ref = Some(graph_ref.into());
        self
    }

    /// Derive the schema id from the schema's SDL
    pub fn schema(mut self, sdl: &str) -> Self {
        self.executable_schema_id = Some(sha256_hex(sdl));
        self
    }

    pub fn executable_schema_id(mut self, id: impl Into<String>) -> Self {
        self.executable_schema_id = Some(id.into());
        self
    }

    pub fn build(self) -> ReportHeader {
        ReportHeader {
            hostname: self.hostname.unwrap_or_else(default_hostname),
            agent_version: agent_version(),
            service_version: self.service_version.unwrap_or_default(),
            runtime_version: self.runtime_version.unwrap_or_else(default_runtime),
            uname: uname(),
            graph_ref: self.graph_ref.unwrap_or_default(),
            executable_schema_id: self.executable_schema_id.unwrap_or_default(),
        }
    }
}

fn default_hostname() -> String {
    [ENV_WEBSITE_HOSTNAME, ENV_HOSTNAME]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_HOSTNAME.to_string())
}

fn agent_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_runtime() -> String {
    format!("rust {}/{}", std::env::consts::OS, std::env::consts::ARCH)
}

fn uname() -> String {
    format!("{}, {}", std::env::consts::OS, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let header = ReportHeader::builder()
            .hostname("web-1")
            .service_version("1.4.2")
            .graph_ref("starwars@current")
            .executable_schema_id("abc")
            .build();

        assert_eq!(header.hostname, "web-1");
        assert_eq!(header.service_version, "1.4.2");
        assert_eq!(header.graph_ref, "starwars@current");
        assert_eq!(header.executable_schema_id, "abc");
    }

    #[test]
    fn test_schema_hash() {
        let header = ReportHeader::builder().schema("type Query { a: Int }").build();
        assert_eq!(header.executable_schema_id, sha256_hex("type Query { a: Int }"));
        assert_eq!(header.executable_schema_id.len(), 64);
    }

    #[test]
    fn test_defaults_are_filled() {
        let header = ReportHeader::default();

        assert!(!header.hostname.is_empty());
        assert!(header.agent_version.starts_with("studio-reporter "));
        assert!(header.runtime_version.starts_with("rust "));
        assert!(header.uname.contains(std::env::consts::OS));
        assert!(header.graph_ref.is_empty());
    }

    #[test]
    fn test_proto_conversion() {
        let header = ReportHeader::builder().hostname("h").graph_ref("g@v").build();
        let wire = proto::ReportHeader::from(&header);
        assert_eq!(wire.hostname, "h");
        assert_eq!(wire.graph_ref, "g@v");
        assert_eq!(wire.agent_version, header.agent_version);
    }
}
