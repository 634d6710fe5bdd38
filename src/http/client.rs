//! Outbound HTTP client used by the relays.
//!
//! # Responsibilities
//! - Build the single upstream GET a handler issues
//! - Send it on its own task, detached from the inbound request
//! - Read the upstream body (bounded prefix or whole)
//!
//! # Design Decisions
//! - Client defaults only: no timeouts, no retries, no pool tuning
//! - A prefix read takes the first data chunk, capped at
//!   [`MAX_BODY_PREFIX`] bytes; the rest of the body is dropped unread
//! - Body read errors after the head arrived yield an empty body

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use http_body_util::BodyExt;
use hyper::body::{Bytes, Incoming};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::borrow::Cow;
use thiserror::Error;

/// Upper bound on how much of an upstream body a relay looks at.
pub const MAX_BODY_PREFIX: usize = 1024;

/// Why an upstream call produced no response.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound request could not be built.
    #[error("{0}")]
    Request(#[from] axum::http::Error),

    /// Connection refused, DNS failure, reset, ...
    #[error("{0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// The task carrying the call died before finishing.
    #[error("upstream task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// How much of the upstream body to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRead {
    /// First chunk only, truncated to the given number of bytes.
    Prefix(usize),
    /// Everything.
    Full,
}

/// One upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamReply {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Body as text, invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Build an outbound GET, optionally carrying forwarded headers.
pub fn build_get(url: &str, headers: Option<&HeaderMap>) -> Result<Request<Body>, RelayError> {
    let mut builder = Request::get(url);
    if let (Some(forwarded), Some(target)) = (headers, builder.headers_mut()) {
        target.extend(forwarded.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Ok(builder.body(Body::empty())?)
}

/// Shared outbound client. Cloning is cheap.
#[derive(Clone)]
pub struct UpstreamClient {
    inner: Client<HttpConnector, Body>,
}

impl UpstreamClient {
    pub fn new() -> Self {
        Self {
            inner: Client::builder(TokioExecutor::new()).build(HttpConnector::new()),
        }
    }

    /// Send `request` and read its body.
    ///
    /// The call runs on a spawned task, so dropping the returned future
    /// (e.g. because the inbound client went away) does not cancel it.
    pub async fn send(
        &self,
        request: Request<Body>,
        read: BodyRead,
    ) -> Result<UpstreamReply, RelayError> {
        let client = self.inner.clone();
        let call = tokio::spawn(async move {
            let response = client.request(request).await?;
            let (parts, body) = response.into_parts();
            let body = match read {
                BodyRead::Prefix(limit) => read_prefix(body, limit).await,
                BodyRead::Full => read_full(body).await,
            };
            Ok::<_, RelayError>(UpstreamReply {
                status: parts.status,
                content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
                body,
            })
        });
        call.await?
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A single read: the first non-empty data frame, capped at `limit`.
async fn read_prefix(mut body: Incoming, limit: usize) -> Bytes {
    while let Some(frame) = body.frame().await {
        let Ok(frame) = frame else {
            break;
        };
        if let Ok(data) = frame.into_data() {
            if !data.is_empty() {
                return data.slice(..data.len().min(limit));
            }
        }
    }
    Bytes::new()
}

async fn read_full(body: Incoming) -> Bytes {
    match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::debug!("upstream body read failed: {e}");
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP/1.1 response per connection.
    async fn canned(raw: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let raw = raw.clone();
                tokio::spawn(async move {
                    let mut request = [0u8; 1024];
                    let _ = socket.read(&mut request).await;
                    let _ = socket.write_all(raw.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}/")
    }

    fn ok_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn build_get_rejects_garbage_url() {
        let err = build_get("http://bad host/", None).unwrap_err();
        assert!(matches!(err, RelayError::Request(_)));
    }

    #[test]
    fn build_get_copies_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("abc"));
        let request = build_get("http://localhost/hello", Some(&headers)).unwrap();
        assert_eq!(request.headers()["x-trace"], "abc");
        assert_eq!(request.method(), axum::http::Method::GET);
    }

    #[tokio::test]
    async fn prefix_read_truncates() {
        let body = "x".repeat(3000);
        let url = canned(ok_response(&body)).await;

        let client = UpstreamClient::new();
        let reply = client
            .send(build_get(&url, None).unwrap(), BodyRead::Prefix(MAX_BODY_PREFIX))
            .await
            .unwrap();

        assert!(reply.is_ok());
        assert!(!reply.body.is_empty());
        assert!(reply.body.len() <= MAX_BODY_PREFIX);
        assert_eq!(reply.content_type.unwrap(), "text/plain");
    }

    #[tokio::test]
    async fn full_read_keeps_everything() {
        let body = "y".repeat(3000);
        let url = canned(ok_response(&body)).await;

        let reply = UpstreamClient::new()
            .send(build_get(&url, None).unwrap(), BodyRead::Full)
            .await
            .unwrap();

        assert_eq!(reply.body.len(), 3000);
    }

    #[tokio::test]
    async fn status_is_reported() {
        let url = canned(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope".into(),
        )
        .await;

        let reply = UpstreamClient::new()
            .send(build_get(&url, None).unwrap(), BodyRead::Prefix(MAX_BODY_PREFIX))
            .await
            .unwrap();

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert!(!reply.is_ok());
        assert_eq!(reply.text(), "nope");
    }

    #[tokio::test]
    async fn dropping_send_leaves_the_call_running() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let delivered = Arc::new(AtomicBool::new(false));
        let flag = delivered.clone();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            tokio::time::sleep(Duration::from_millis(200)).await;
            let head = "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            // Only lands if the client end is still open.
            tokio::time::sleep(Duration::from_millis(50)).await;
            if socket.write_all(b"DB").await.is_ok() {
                flag.store(true, Ordering::SeqCst);
            }
        });

        let client = UpstreamClient::new();
        let request = build_get(&format!("http://{addr}/good/db"), None).unwrap();
        let send = client.send(request, BodyRead::Prefix(MAX_BODY_PREFIX));
        assert!(tokio::time::timeout(Duration::from_millis(20), send)
            .await
            .is_err());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(delivered.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        // Grab a free port, then close it.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = UpstreamClient::new()
            .send(
                build_get(&format!("http://{addr}/good/db"), None).unwrap(),
                BodyRead::Prefix(MAX_BODY_PREFIX),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Transport(_)));
    }
}
