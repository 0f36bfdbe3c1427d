use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::string::non_blank;

use super::constants::{
    DEFAULT_ENDPOINT, DEFAULT_FLUSH_INTERVAL_SECS, DEFAULT_MAX_BATCH_BYTES,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS, ENV_APOLLO_KEY, ENV_CONFIG,
    ENV_GRAPH_REF, ENV_REPORT_ENDPOINT,
};

// =============================================================================
// File Config
// =============================================================================

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub graph_ref: Option<String>,
    pub endpoint: Option<String>,
    pub flush_interval_secs: Option<u64>,
    pub max_batch_bytes: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub shutdown_timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Reporter Config
// =============================================================================

#[derive(Clone)]
pub struct ReporterConfig {
    pub api_key: String,
    pub graph_ref: String,
    pub endpoint: String,
    pub flush_interval: Duration,
    pub max_batch_bytes: usize,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl std::fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("api_key", &"[REDACTED]")
            .field("graph_ref", &self.graph_ref)
            .field("endpoint", &self.endpoint)
            .field("flush_interval", &self.flush_interval)
            .field("max_batch_bytes", &self.max_batch_bytes)
            .field("request_timeout", &self.request_timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

impl ReporterConfig {
    /// Defaults for everything except the credentials
    pub fn new(api_key: impl Into<String>, graph_ref: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            graph_ref: graph_ref.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            flush_interval: Duration::from_secs(DEFAULT_FLUSH_INTERVAL_SECS),
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Load configuration from the process environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`APOLLO_KEY`, `APOLLO_GRAPH_REF`, `APOLLO_REPORT_ENDPOINT`)
    /// 2. JSON file named by `STUDIO_REPORTER_CONFIG`
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        let file = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);
        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Layer defaults, an optional config file and an environment lookup
    pub fn from_sources(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file_config = match file {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                let config = FileConfig::load_from_file(path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        let env_value = |key: &str| env(key).filter(|v| non_blank(Some(v.as_str())).is_some());

        let mut config = Self::new(
            env_value(ENV_APOLLO_KEY)
                .or(file_config.api_key)
                .unwrap_or_default(),
            env_value(ENV_GRAPH_REF)
                .or(file_config.graph_ref)
                .unwrap_or_default(),
        );
        if let Some(endpoint) = env_value(ENV_REPORT_ENDPOINT).or(file_config.endpoint) {
            config.endpoint = endpoint;
        }
        if let Some(secs) = file_config.flush_interval_secs {
            config.flush_interval = Duration::from_secs(secs);
        }
        if let Some(bytes) = file_config.max_batch_bytes {
            config.max_batch_bytes = bytes;
        }
        if let Some(secs) = file_config.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file_config.shutdown_timeout_secs {
            config.shutdown_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        tracing::debug!(config = ?config, "Reporter configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "Configuration error: API key is required (set {})",
                ENV_APOLLO_KEY
            );
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!(
                "Configuration error: endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            );
        }
        if self.flush_interval.is_zero() {
            anyhow::bail!("Configuration error: flush_interval_secs must be greater than 0");
        }
        if self.max_batch_bytes == 0 {
            anyhow::bail!("Configuration error: max_batch_bytes must be greater than 0");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("Configuration error: request_timeout_secs must be greater than 0");
        }
        if self.shutdown_timeout.is_zero() {
            anyhow::bail!("Configuration error: shutdown_timeout_secs must be greater than 0");
        }
        if self.graph_ref.is_empty() {
            tracing::warn!(
                "No graph reference configured (set {}), reports may be rejected",
                ENV_GRAPH_REF
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_with_env_key() {
        let config =
            ReporterConfig::from_sources(None, env(&[("APOLLO_KEY", "service:k")])).unwrap();

        assert_eq!(config.api_key, "service:k");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.flush_interval, Duration::from_secs(20));
        assert_eq!(config.max_batch_bytes, 2 * 1024 * 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = ReporterConfig::from_sources(None, env(&[("APOLLO_KEY", "   ")])).unwrap_err();
        assert!(err.to_string().contains("API key is required"));
    }

    #[test]
    fn test_file_values_apply() {
        let file = config_file(
            r#"{
                "api_key": "file-key",
                "graph_ref": "starwars@prod",
                "flush_interval_secs": 5,
                "max_batch_bytes": 1024,
                "request_timeout_secs": 10,
                "shutdown_timeout_secs": 1
            }"#,
        );

        let config = ReporterConfig::from_sources(Some(file.path()), env(&[])).unwrap();

        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.graph_ref, "starwars@prod");
        assert_eq!(config.flush_interval, Duration::from_secs(5));
        assert_eq!(config.max_batch_bytes, 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = config_file(
            r#"{"api_key": "file-key", "graph_ref": "g@file", "endpoint": "http://file/traces"}"#,
        );

        let config = ReporterConfig::from_sources(
            Some(file.path()),
            env(&[
                ("APOLLO_KEY", "env-key"),
                ("APOLLO_GRAPH_REF", "g@env"),
                ("APOLLO_REPORT_ENDPOINT", "http://env/traces"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.graph_ref, "g@env");
        assert_eq!(config.endpoint, "http://env/traces");
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let file = config_file(r#"{"api_key": "k", "flush_intervall_secs": 3}"#);
        let config = ReporterConfig::from_sources(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.flush_interval, Duration::from_secs(20));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = ReporterConfig::from_sources(
            Some(Path::new("/nonexistent/reporter.json")),
            env(&[]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let file = config_file("{ not json");
        let err = ReporterConfig::from_sources(Some(file.path()), env(&[])).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ReporterConfig::new("k", "g@v");
        config.endpoint = "ftp://example".to_string();
        assert!(config.validate().is_err());

        let mut config = ReporterConfig::new("k", "g@v");
        config.flush_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = ReporterConfig::new("k", "g@v");
        config.max_batch_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = ReporterConfig::new("k", "g@v");
        config.shutdown_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        assert!(ReporterConfig::new("k", "").validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ReporterConfig::new("service:secret", "g@v");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
