//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (bind, fatal on failure)
//!     → Hand off to the HTTP layer (axum::serve)
//! ```
//!
//! Connection multiplexing and per-request tasks are left to hyper.

pub mod listener;

pub use listener::{bind, ListenerError};
