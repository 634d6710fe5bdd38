//! Observability subsystem.
//!
//! Plain text log lines only (see [`logging`]). Each handler logs through
//! `tracing` macros with the caller's address as a `[addr]` prefix, so one
//! request can be followed across all services by the peer ports.

pub mod logging;
