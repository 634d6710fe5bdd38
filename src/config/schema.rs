//! Configuration schema definitions.
//!
//! Every service is configured once at startup from its command line and
//! the resulting structs are immutable for the life of the process.

use std::path::PathBuf;

use clap::ValueEnum;

/// Default bind address of the db service.
pub const DEFAULT_DB_ADDR: &str = ":8082";
/// Default bind address of the backend service.
pub const DEFAULT_BACKEND_ADDR: &str = ":8081";
/// Default bind address of the web service.
pub const DEFAULT_WEB_ADDR: &str = ":8080";
/// Default bind address of the api gateway.
pub const DEFAULT_API_ADDR: &str = ":5000";

/// Where the db service answers.
pub const DEFAULT_DB_URL: &str = "http://localhost:8082/good/db";
/// Where the backend service answers.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8081/good/backend";
/// Base URL of the web service, used by the api gateway.
pub const DEFAULT_WEB_URL: &str = "http://localhost:8080";

/// Settings shared by every service process.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Log sink configuration.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Bind address, already normalized (e.g. "0.0.0.0:8080").
    pub bind_address: String,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Line prefix identifying the service ("web> ", "db> ", ...).
    pub prefix: String,

    /// Append to this file instead of stdout.
    pub file: Option<PathBuf>,

    /// Filter directive (e.g. "info", "tiered_relay=debug").
    pub level: String,
}

impl LoggingConfig {
    /// Stdout logging at `info` for the named service.
    pub fn for_service(name: &str) -> Self {
        Self {
            prefix: format!("{name}> "),
            file: None,
            level: "info".to_string(),
        }
    }
}

/// What a relay answers when its upstream call cannot be made at all.
///
/// Only applies to request construction and transport failures. Unexpected
/// upstream statuses are handled per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FailurePolicy {
    /// Write nothing; the caller sees an empty 200. The api gateway answers
    /// 500 instead.
    #[default]
    Silent,
    /// Answer 502 Bad Gateway with an empty body.
    BadGateway,
}

/// Backend service configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// URL of the db route.
    pub db_url: String,

    pub on_upstream_error: FailurePolicy,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            on_upstream_error: FailurePolicy::default(),
        }
    }
}

/// Web service configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// URL of the backend route (good path).
    pub backend_url: String,

    /// URL of the db route, reached directly by the bad path.
    pub db_url: String,

    pub on_upstream_error: FailurePolicy,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            db_url: DEFAULT_DB_URL.to_string(),
            on_upstream_error: FailurePolicy::default(),
        }
    }
}

/// API gateway configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the web service; request paths are appended to it.
    pub web_url: String,

    pub on_upstream_error: FailurePolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            web_url: DEFAULT_WEB_URL.to_string(),
            on_upstream_error: FailurePolicy::default(),
        }
    }
}
