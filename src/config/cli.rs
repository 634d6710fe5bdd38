//! Command-line arguments for the service binaries.
//!
//! Each binary parses its own `*Args` struct and turns it into the config
//! structs of [`crate::config::schema`].

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::config::schema::{
    ApiConfig, BackendConfig, FailurePolicy, ListenerConfig, LoggingConfig, ServiceConfig,
    WebConfig, DEFAULT_API_ADDR, DEFAULT_BACKEND_ADDR, DEFAULT_BACKEND_URL, DEFAULT_DB_ADDR,
    DEFAULT_DB_URL, DEFAULT_WEB_ADDR, DEFAULT_WEB_URL,
};
use crate::config::validation::{normalize_bind_address, validate_upstream_url, ConfigError};

/// Logging flags shared by every service.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Path to log to (empty = stdout)
    #[arg(long = "log", value_name = "PATH")]
    pub log: Option<String>,

    /// Log filter directive
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}

impl LogArgs {
    fn logging(&self, name: &str) -> LoggingConfig {
        LoggingConfig {
            // An empty --log means stdout, like leaving it out.
            file: self.log.as_deref().filter(|p| !p.is_empty()).map(PathBuf::from),
            level: self.log_level.clone(),
            ..LoggingConfig::for_service(name)
        }
    }
}

fn service_config(name: &str, addr: &str, log: &LogArgs) -> Result<ServiceConfig, ConfigError> {
    Ok(ServiceConfig {
        listener: ListenerConfig {
            bind_address: normalize_bind_address(addr)?,
        },
        logging: log.logging(name),
    })
}

#[derive(Parser, Debug, Clone)]
#[command(name = "db-server", about = "Leaf service of the three-tier demo")]
pub struct DbArgs {
    /// Address to bind the db server to
    #[arg(long, default_value = DEFAULT_DB_ADDR)]
    pub addr: String,

    #[command(flatten)]
    pub log: LogArgs,
}

impl DbArgs {
    pub fn service(&self) -> Result<ServiceConfig, ConfigError> {
        service_config("db", &self.addr, &self.log)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "backend-server", about = "Relays the good path to the db service")]
pub struct BackendArgs {
    /// Address to bind the backend server to
    #[arg(long, default_value = DEFAULT_BACKEND_ADDR)]
    pub addr: String,

    /// URL of the db service route
    #[arg(long, default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Answer to give when the db service cannot be reached
    #[arg(long, value_enum, default_value_t = FailurePolicy::Silent)]
    pub on_upstream_error: FailurePolicy,

    #[command(flatten)]
    pub log: LogArgs,
}

impl BackendArgs {
    pub fn service(&self) -> Result<ServiceConfig, ConfigError> {
        service_config("backend", &self.addr, &self.log)
    }

    pub fn backend(&self) -> Result<BackendConfig, ConfigError> {
        Ok(BackendConfig {
            db_url: validate_upstream_url(&self.db_url)?,
            on_upstream_error: self.on_upstream_error,
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "web-server", about = "Public entry point of the three-tier demo")]
pub struct WebArgs {
    /// Address to bind the web server to
    #[arg(long, default_value = DEFAULT_WEB_ADDR)]
    pub addr: String,

    /// URL of the backend service route
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// URL the bad path dials directly
    #[arg(long, default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Answer to give when an upstream cannot be reached
    #[arg(long, value_enum, default_value_t = FailurePolicy::Silent)]
    pub on_upstream_error: FailurePolicy,

    #[command(flatten)]
    pub log: LogArgs,
}

impl WebArgs {
    pub fn service(&self) -> Result<ServiceConfig, ConfigError> {
        service_config("web", &self.addr, &self.log)
    }

    pub fn web(&self) -> Result<WebConfig, ConfigError> {
        Ok(WebConfig {
            backend_url: validate_upstream_url(&self.backend_url)?,
            db_url: validate_upstream_url(&self.db_url)?,
            on_upstream_error: self.on_upstream_error,
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "api-server", about = "Gateway in front of the web service")]
pub struct ApiArgs {
    /// Address to bind the api gateway to
    #[arg(long, default_value = DEFAULT_API_ADDR)]
    pub addr: String,

    /// Base URL of the web service
    #[arg(long, default_value = DEFAULT_WEB_URL)]
    pub web_url: String,

    /// Answer to give when the web service cannot be reached
    #[arg(long, value_enum, default_value_t = FailurePolicy::Silent)]
    pub on_upstream_error: FailurePolicy,

    #[command(flatten)]
    pub log: LogArgs,
}

impl ApiArgs {
    pub fn service(&self) -> Result<ServiceConfig, ConfigError> {
        service_config("api", &self.addr, &self.log)
    }

    pub fn api(&self) -> Result<ApiConfig, ConfigError> {
        Ok(ApiConfig {
            web_url: validate_upstream_url(&self.web_url)?,
            on_upstream_error: self.on_upstream_error,
        })
    }
}
