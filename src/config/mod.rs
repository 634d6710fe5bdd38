//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → cli.rs (clap parse, per-binary args)
//!     → validation.rs (bind address and upstream URL checks)
//!     → ServiceConfig + per-service config (immutable)
//!     → shared via Arc with the handlers
//! ```
//!
//! # Design Decisions
//! - No config file and no environment variables
//! - Inter-service URLs are flags, never literals in handlers

pub mod cli;
pub mod schema;
pub mod validation;

pub use schema::{
    ApiConfig, BackendConfig, FailurePolicy, ListenerConfig, LoggingConfig, ServiceConfig,
    WebConfig,
};
pub use validation::ConfigError;
