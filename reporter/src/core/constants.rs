// =============================================================================
// Application Identity
// =============================================================================

/// Crate name in lowercase (for identifiers and the default log filter)
pub const APP_NAME_LOWER: &str = "studio_reporter";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable holding the graph API key
pub const ENV_APOLLO_KEY: &str = "APOLLO_KEY";

/// Environment variable holding the graph reference (`graph@variant`)
pub const ENV_GRAPH_REF: &str = "APOLLO_GRAPH_REF";

/// Environment variable overriding the report ingress endpoint
pub const ENV_REPORT_ENDPOINT: &str = "APOLLO_REPORT_ENDPOINT";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "STUDIO_REPORTER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "STUDIO_REPORTER_LOG";

/// Host name set by Azure App Service
pub const ENV_WEBSITE_HOSTNAME: &str = "WEBSITE_HOSTNAME";

/// Host name set by most Unix shells and container runtimes
pub const ENV_HOSTNAME: &str = "HOSTNAME";

// =============================================================================
// Reporting Defaults
// =============================================================================

/// Apollo Studio trace ingress
pub const DEFAULT_ENDPOINT: &str = "https://engine-report.apollodata.com/api/ingress/traces";

/// Time between scheduled flushes
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 20;

/// Estimated batch size that triggers an early flush (2 MiB)
pub const DEFAULT_MAX_BATCH_BYTES: usize = 2 * 1024 * 1024;

/// Per-request timeout for report uploads
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Time allowed for the final flush once shutdown is requested
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Reported when no host name can be determined
pub const UNKNOWN_HOSTNAME: &str = "unknown";
