//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Report bind failures as fatal startup errors

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Bound, but the OS would not report the local address.
    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Bind a listener to the configured (already normalized) address.
///
/// Host names are resolved by tokio; the first address that binds wins.
pub async fn bind(config: &ListenerConfig) -> Result<(TcpListener, SocketAddr), ListenerError> {
    let listener = TcpListener::bind(config.bind_address.as_str())
        .await
        .map_err(|source| ListenerError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    let local_addr = listener.local_addr().map_err(ListenerError::LocalAddr)?;

    tracing::debug!("bound {local_addr}");

    Ok((listener, local_addr))
}
