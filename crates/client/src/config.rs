//! Client connection settings.

use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};
use crate::socket::ReconnectConfig;

/// Where the backend lives and how the realtime socket reconnects.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root without a trailing slash or `/api` suffix,
    /// e.g. `http://192.168.1.10:5001`.
    server_root: Url,
    pub reconnect: ReconnectConfig,
    /// Per-request timeout for REST calls.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Build a config from a base URL as configured in the app.
    ///
    /// Both `http://host:5001` and `http://host:5001/api/` are accepted.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let server_root = Url::parse(&normalize_base_url(base_url))
            .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if !matches!(server_root.scheme(), "http" | "https") || server_root.host().is_none() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            server_root,
            reconnect: ReconnectConfig::default(),
            request_timeout: Duration::from_secs(20),
        })
    }

    pub fn server_root(&self) -> &str {
        self.server_root.as_str().trim_end_matches('/')
    }

    /// REST base, always ending in `/api`.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.server_root())
    }

    /// Realtime endpoint: `ws://` or `wss://` plus `/ws`.
    pub fn socket_url(&self) -> String {
        let mut url = self.server_root.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) and ws(s) are all special schemes, so the swap is accepted.
        if url.set_scheme(scheme).is_err() {
            tracing::warn!(url = %url, "Could not switch socket URL scheme");
        }
        let path = format!("{}/ws", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.to_string()
    }
}

/// Strip surrounding whitespace, trailing slashes and an `/api` suffix
/// (case-insensitive).
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let lower = trimmed.to_ascii_lowercase();
    let without_api = if lower.ends_with("/api") {
        &trimmed[..trimmed.len() - 4]
    } else {
        trimmed
    };
    without_api.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_and_api_suffix_are_stripped() {
        assert_eq!(normalize_base_url("http://host:5001/"), "http://host:5001");
        assert_eq!(normalize_base_url("http://host:5001/api"), "http://host:5001");
        assert_eq!(normalize_base_url("http://host:5001/API/"), "http://host:5001");
        assert_eq!(normalize_base_url(" http://host:5001 "), "http://host:5001");
    }

    #[test]
    fn socket_url_swaps_scheme() {
        let plain = ClientConfig::new("http://host:5001/api").unwrap();
        assert_eq!(plain.socket_url(), "ws://host:5001/ws");
        assert_eq!(plain.api_url(), "http://host:5001/api");

        let tls = ClientConfig::new("https://solesync.example.com").unwrap();
        assert_eq!(tls.socket_url(), "wss://solesync.example.com/ws");
    }

    #[test]
    fn socket_url_keeps_path_prefix() {
        let config = ClientConfig::new("https://example.com/solesync/api/").unwrap();
        assert_eq!(config.api_url(), "https://example.com/solesync/api");
        assert_eq!(config.socket_url(), "wss://example.com/solesync/ws");
    }

    #[test]
    fn non_http_urls_are_rejected() {
        assert!(ClientConfig::new("ftp://host").is_err());
        assert!(ClientConfig::new("").is_err());
        assert!(ClientConfig::new("host-without-scheme:5001").is_err());
    }
}
