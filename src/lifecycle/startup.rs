//! Startup orchestration.
//!
//! Logging first, then the listener, then serving. Any failure before
//! serving starts is fatal: it is printed to stderr and the process exits
//! non-zero.

use std::error::Error as _;
use std::process::ExitCode;
use std::sync::Arc;

use axum::Router;

use crate::config::ServiceConfig;
use crate::error::StartupError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net;
use crate::observability::logging;

/// Run one service process until a termination signal arrives.
pub async fn launch(
    name: &'static str,
    config: ServiceConfig,
    routes: Router,
) -> Result<(), StartupError> {
    logging::init(&config.logging)?;
    tracing::info!("starting {name} server...");

    let (listener, _) = net::bind(&config.listener).await?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::forward_to(shutdown);

    HttpServer::new(name, routes)
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)
}

/// Turn the outcome of a service run into the process exit code.
pub fn exit_code(result: Result<(), StartupError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
