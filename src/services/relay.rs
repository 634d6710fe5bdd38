//! The one upstream hop a relay handler makes, with its log lines.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::body::Bytes;
use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::http::client::build_get;
use crate::http::{BodyRead, Peer, RelayError, UpstreamClient, UpstreamReply};

/// GET `url` on behalf of `peer`. `upstream` names the service in log lines.
///
/// Every failure is logged here; callers only decide what to answer.
pub(crate) async fn get(
    client: &UpstreamClient,
    peer: Peer,
    upstream: &str,
    url: &str,
    headers: Option<&HeaderMap>,
    read: BodyRead,
) -> Result<UpstreamReply, RelayError> {
    let request = build_get(url, headers).inspect_err(|e| {
        warn!("[{peer}] failed to create request for {upstream}: {e}");
    })?;

    info!("[{peer}] Issuing GET {url}");
    match client.send(request, read).await {
        Ok(reply) => {
            info!("[{peer}] GOT {url}");
            Ok(reply)
        }
        Err(e) => {
            warn!("[{peer}] failed to send request to {upstream}: {e}");
            Err(e)
        }
    }
}

pub(crate) fn log_unexpected(peer: Peer, upstream: &str, reply: &UpstreamReply) {
    warn!(
        "[{peer}] unexpected {upstream} response: {}\n{}",
        reply.status.as_u16(),
        reply.text()
    );
}

pub(crate) fn log_ok(peer: Peer, upstream: &str, reply: &UpstreamReply) {
    info!("[{peer}] {upstream} response OK. Response body: {}", reply.text());
}

/// `head`, the upstream body byte for byte, then `tail`.
///
/// A truncated body may end inside a UTF-8 sequence; it is relayed as is.
pub(crate) fn wrap(head: &str, body: &[u8], tail: &str) -> Response {
    let mut out = Vec::with_capacity(head.len() + body.len() + tail.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(tail.as_bytes());
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Bytes::from(out),
    )
        .into_response()
}

impl FailurePolicy {
    /// Answer for a request whose upstream call produced nothing.
    pub fn respond(self) -> Response {
        match self {
            FailurePolicy::Silent => ().into_response(),
            FailurePolicy::BadGateway => StatusCode::BAD_GATEWAY.into_response(),
        }
    }
}
