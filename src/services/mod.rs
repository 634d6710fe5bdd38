//! The services of the demo, outermost last.
//!
//! # Call Graph
//! ```text
//! caller → api → web ──/the/good/path──→ backend → db
//!                 │
//!                 └────/the/bad/path───────────→ db   (should be blocked by the network)
//! ```
//!
//! Each module exposes its bare routes through `router`; the shared
//! middleware is added by [`crate::http::HttpServer`]. Handlers keep no
//! state between requests.

pub mod api;
pub mod backend;
pub mod db;
mod relay;
pub mod web;
