//! Shared utilities for the integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tiered_relay::config::{BackendConfig, FailurePolicy, WebConfig};
use tiered_relay::http::{HttpServer, UpstreamClient};
use tiered_relay::services::{backend, db, web};
use tiered_relay::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `routes` through the real middleware stack on an ephemeral port.
pub async fn spawn_service(name: &'static str, routes: Router, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(name, routes);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    addr
}

/// An address nothing listens on.
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub async fn spawn_db(shutdown: &Shutdown) -> SocketAddr {
    spawn_service(db::NAME, db::router(), shutdown).await
}

pub fn db_url(addr: SocketAddr) -> String {
    format!("http://{addr}{}", db::ROUTE)
}

pub fn backend_url(addr: SocketAddr) -> String {
    format!("http://{addr}{}", backend::ROUTE)
}

pub async fn spawn_backend(db: SocketAddr, policy: FailurePolicy, shutdown: &Shutdown) -> SocketAddr {
    let config = BackendConfig {
        db_url: db_url(db),
        on_upstream_error: policy,
    };
    spawn_service(
        backend::NAME,
        backend::router(config, UpstreamClient::new()),
        shutdown,
    )
    .await
}

pub async fn spawn_web(
    backend_url: String,
    db_url: String,
    policy: FailurePolicy,
    shutdown: &Shutdown,
) -> SocketAddr {
    let config = WebConfig {
        backend_url,
        db_url,
        on_upstream_error: policy,
    };
    spawn_service(web::NAME, web::router(config, UpstreamClient::new()), shutdown).await
}

/// A client that never reuses connections and ignores proxy env vars.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

fn raw_response(status: u16, body: &str) -> String {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )
}

/// Start a raw TCP upstream answering every request with `f()`.
///
/// Returns the bound address and the raw text of every request received.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = seen.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                recorded
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf[..n]).into_owned());

                let (status, body) = f().await;
                let _ = socket.write_all(raw_response(status, &body).as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    (addr, seen)
}

/// Start a raw TCP upstream with a fixed status and body.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_upstream(move || async move { (status, body.to_string()) })
        .await
        .0
}

/// Start a raw TCP upstream that waits `delay` before answering 200 `body`.
///
/// The head and the body go out in two writes 50ms apart. The returned flag
/// is set only if both land, i.e. the caller was still connected and reading
/// when the body was sent.
pub async fn start_slow_upstream(delay: Duration, body: &'static str) -> (SocketAddr, Arc<AtomicBool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let delivered = Arc::new(AtomicBool::new(false));

    let flag = delivered.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let flag = flag.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;

                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
                if socket.write_all(body.as_bytes()).await.is_ok() && socket.flush().await.is_ok() {
                    flag.store(true, Ordering::SeqCst);
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, delivered)
}

/// Poll `flag` for up to two seconds.
pub async fn eventually(flag: &AtomicBool) -> bool {
    for _ in 0..100 {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

pub fn assert_no_cache(response: &reqwest::Response) {
    assert_eq!(response.headers()["cache-control"], "no-cache");
    assert_eq!(response.headers()["expires"], "0");
}
