//! Access log middleware.
//!
//! Logs `[<remote>] <method> <uri>` for every inbound request and makes the
//! remote address available to handlers as a [`Peer`] so their own log lines
//! carry the same prefix.

use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};

/// Remote address of the connection a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peer(Option<SocketAddr>);

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(addr) => write!(f, "{addr}"),
            None => f.write_str("unknown"),
        }
    }
}

impl<S> FromRequestParts<S> for Peer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(peer) = parts.extensions.get::<Peer>() {
            return Ok(*peer);
        }
        let connected = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr);
        Ok(Self(connected))
    }
}

pub async fn access_log(peer: Peer, mut req: Request<Body>, next: Next) -> Response {
    tracing::info!("[{}] {} {}", peer, req.method(), req.uri());
    req.extensions_mut().insert(peer);
    next.run(req).await
}
