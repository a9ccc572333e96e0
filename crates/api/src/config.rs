use std::time::Duration;

use solesync_events::BackoffConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub watch: WatchConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `5001`                   |
    /// | `CORS_ORIGINS`         | `http://localhost:8081`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8081".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            watch: WatchConfig::from_env(),
        }
    }
}

/// Restart backoff of the change feed watcher.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl WatchConfig {
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `WATCH_INITIAL_BACKOFF_MS` | `1000`  |
    /// | `WATCH_MAX_BACKOFF_MS`     | `30000` |
    pub fn from_env() -> Self {
        let initial_backoff_ms: u64 = std::env::var("WATCH_INITIAL_BACKOFF_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("WATCH_INITIAL_BACKOFF_MS must be a valid u64");

        let max_backoff_ms: u64 = std::env::var("WATCH_MAX_BACKOFF_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .expect("WATCH_MAX_BACKOFF_MS must be a valid u64");

        Self {
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    pub fn backoff(&self) -> BackoffConfig {
        BackoffConfig {
            initial_delay: Duration::from_millis(self.initial_backoff_ms),
            max_delay: Duration::from_millis(self.max_backoff_ms.max(self.initial_backoff_ms)),
            ..Default::default()
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
        }
    }
}
