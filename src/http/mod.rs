//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve, peer address capture)
//!     → headers.rs (no-cache policy on the way out)
//!     → access_log.rs (request line logged, Peer attached)
//!     → service handler (crate::services)
//!         → client.rs (one outbound GET, when the route relays)
//! ```

pub mod access_log;
pub mod client;
pub mod headers;
pub mod server;

pub use access_log::Peer;
pub use client::{BodyRead, RelayError, UpstreamClient, UpstreamReply, MAX_BODY_PREFIX};
pub use server::HttpServer;
