//! Client identity
//!
//! Clients identify themselves with the `apollographql-client-name` and
//! `apollographql-client-version` headers. Without them the `User-Agent` is
//! split on `/` and its first and last tokens are used instead.

use reqwest::header::{HeaderMap, USER_AGENT};

/// Header carrying the client name
pub const CLIENT_NAME_HEADER: &str = "apollographql-client-name";

/// Header carrying the client version
pub const CLIENT_VERSION_HEADER: &str = "apollographql-client-version";

/// User agent assumed when the request has none
pub const DEFAULT_USER_AGENT: &str = "Unknown/Unknown";

/// Name and version of the client that sent a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::from_user_agent(DEFAULT_USER_AGENT)
    }
}

impl ClientInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// First `/`-separated token is the name, the last one the version
    pub fn from_user_agent(user_agent: &str) -> Self {
        let mut tokens = user_agent.split('/');
        let name = tokens.next().unwrap_or_default();
        let version = tokens.next_back().unwrap_or(name);
        Self::new(name, version)
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let fallback = Self::from_user_agent(
            headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(DEFAULT_USER_AGENT),
        );

        Self {
            name: header(CLIENT_NAME_HEADER).unwrap_or(fallback.name),
            version: header(CLIENT_VERSION_HEADER).unwrap_or(fallback.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_from_headers_prefers_client_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_NAME_HEADER, HeaderValue::from_static("web"));
        headers.insert(CLIENT_VERSION_HEADER, HeaderValue::from_static("1.4.0"));
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.5.0"));

        assert_eq!(ClientInfo::from_headers(&headers), ClientInfo::new("web", "1.4.0"));
    }

    #[test]
    fn test_from_headers_falls_back_to_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.5.0"));

        assert_eq!(ClientInfo::from_headers(&headers), ClientInfo::new("curl", "8.5.0"));
    }

    #[test]
    fn test_from_headers_mixes_sources() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_NAME_HEADER, HeaderValue::from_static("ios"));
        headers.insert(USER_AGENT, HeaderValue::from_static("App/2/3.1"));

        assert_eq!(ClientInfo::from_headers(&headers), ClientInfo::new("ios", "3.1"));
    }

    #[test]
    fn test_from_headers_without_anything() {
        assert_eq!(
            ClientInfo::from_headers(&HeaderMap::new()),
            ClientInfo::new("Unknown", "Unknown")
        );
    }

    #[test]
    fn test_from_user_agent_without_separator() {
        assert_eq!(ClientInfo::from_user_agent("curl"), ClientInfo::new("curl", "curl"));
    }
}
