//! Process-level errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::ListenerError;
use crate::observability::logging::LoggingError;

/// Anything that stops a service from starting (or keeps serving from
/// continuing).
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unable to set up logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("unable to listen: {0}")]
    Listener(#[from] ListenerError),

    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}
