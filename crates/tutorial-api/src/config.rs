//! # Application Configuration
//!
//! Configuration is read from environment variables at startup. There is
//! no configuration file. Every variable is optional; invalid values abort
//! startup with a [`ConfigError`] rather than silently falling back.
//!
//! | Variable          | Default                 | Meaning                                  |
//! |-------------------|-------------------------|------------------------------------------|
//! | `PORT`            | `8080`                  | HTTP listen port                         |
//! | `DATABASE_URL`    | unset                   | Postgres URL; unset = in-memory only     |
//! | `CORS_ORIGIN`     | `http://localhost:8081` | Allowed browser origin, `*` for any      |
//! | `METRICS_ENABLED` | `false`                 | Mount `/metrics` and record HTTP metrics |
//! | `LOG_FORMAT`      | `text`                  | `json` for structured log lines          |

use std::collections::HashMap;

use axum::http::HeaderValue;
use thiserror::Error;

/// Origin the bundled frontend is served from during development.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8081";

/// Errors raised while reading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("invalid value for {name}: \"{value}\" ({reason})")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value found in the environment.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Browser origins allowed by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    /// Any origin (`*`).
    Any,
    /// Exactly one origin.
    Exact(HeaderValue),
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Runtime configuration for the API server.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection URL. `None` runs the service in-memory only.
    pub database_url: Option<String>,
    /// CORS allowed origin.
    pub cors_origin: CorsOrigin,
    /// Whether Prometheus metrics are recorded and exposed.
    pub metrics_enabled: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cors_origin", &self.cors_origin)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            cors_origin: CorsOrigin::Exact(HeaderValue::from_static(DEFAULT_CORS_ORIGIN)),
            metrics_enabled: false,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.to_string(),
                reason: "expected an integer between 0 and 65535",
            })?,
            None => defaults.port,
        };

        let cors_origin = match get("CORS_ORIGIN") {
            Some("*") => CorsOrigin::Any,
            Some(raw) => HeaderValue::from_str(raw)
                .map(CorsOrigin::Exact)
                .map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGIN",
                    value: raw.to_string(),
                    reason: "not a valid header value",
                })?,
            None => defaults.cors_origin,
        };

        let metrics_enabled = match get("METRICS_ENABLED") {
            Some(raw) => parse_bool(raw).ok_or_else(|| ConfigError::Invalid {
                name: "METRICS_ENABLED",
                value: raw.to_string(),
                reason: "expected true/false",
            })?,
            None => defaults.metrics_enabled,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(raw) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: raw.to_string(),
                    reason: "expected \"text\" or \"json\"",
                })
            }
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL").map(String::from),
            cors_origin,
            metrics_enabled,
            log_format,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
