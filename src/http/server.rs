//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap a service's routes with the shared middleware stack
//!   (access log, no-cache headers)
//! - Serve them on a bound listener with peer addresses available
//! - Stop on the shutdown signal

use std::net::SocketAddr;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::http::access_log::access_log;
use crate::http::headers::no_cache;

/// Apply the middleware every service shares to `routes`.
///
/// The no-cache layer sits outermost so that responses generated by the
/// other layers (and the 404/405 fallbacks) carry it too.
pub fn with_middleware(routes: Router) -> Router {
    no_cache(routes.layer(middleware::from_fn(access_log)))
}

/// HTTP server for one service of the demo.
pub struct HttpServer {
    name: &'static str,
    router: Router,
}

impl HttpServer {
    /// `routes` is the bare service router; middleware is added here.
    pub fn new(name: &'static str, routes: Router) -> Self {
        Self {
            name,
            router: with_middleware(routes),
        }
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve connections on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("listening on {addr}...");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("{} server stopped", self.name);
        Ok(())
    }
}
