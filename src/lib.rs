//! Three-tier relay demonstration.
//!
//! Four small HTTP services that call each other in a line:
//!
//! ```text
//!     caller → api → web → backend → db
//!                     └──────────────→ db   (the "bad path")
//! ```
//!
//! The bad path shows that keeping the db away from the web tier is a job
//! for the network; the web handler itself will happily relay a 200.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod services;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use error::StartupError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
