//! Configuration validation.
//!
//! Runs once while the command line is turned into config structs, so a bad
//! address or URL stops the process before anything is bound.

use axum::http::Uri;
use thiserror::Error;

/// A rejected configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid bind address {address:?}: {reason}")]
    BindAddress { address: String, reason: String },

    #[error("invalid upstream url {url:?}: {reason}")]
    UpstreamUrl { url: String, reason: String },
}

/// Normalize a bind address.
///
/// A bare `:PORT` binds every IPv4 interface. Anything else must be
/// `host:port` (or `[v6]:port`) with a numeric port; the host part is left
/// for the resolver.
pub fn normalize_bind_address(address: &str) -> Result<String, ConfigError> {
    let reject = |reason: &str| ConfigError::BindAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| reject("missing port"))?;

    port.parse::<u16>().map_err(|_| reject("port must be a number in 0..=65535"))?;

    if host.is_empty() {
        return Ok(format!("0.0.0.0:{port}"));
    }
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return Err(reject("IPv6 hosts must be bracketed"));
    }

    Ok(address.to_string())
}

/// Check that an upstream URL can be dialed by the plain-HTTP client.
pub fn validate_upstream_url(url: &str) -> Result<String, ConfigError> {
    let reject = |reason: String| ConfigError::UpstreamUrl {
        url: url.to_string(),
        reason,
    };

    let uri: Uri = url.parse().map_err(|e| reject(format!("{e}")))?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => return Err(reject(format!("unsupported scheme {other:?}"))),
        None => return Err(reject("missing scheme".to_string())),
    }
    if uri.authority().is_none() {
        return Err(reject("missing host".to_string()));
    }

    Ok(url.to_string())
}
