//! Web service: the public entry point.
//!
//! `/the/good/path` goes through the backend. `/the/bad/path` dials the db
//! directly; whether that works is decided by the network, not by this
//! handler, which has no access control of its own.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::config::{FailurePolicy, WebConfig};
use crate::http::{BodyRead, Peer, UpstreamClient, UpstreamReply, MAX_BODY_PREFIX};
use crate::services::relay;

pub const NAME: &str = "web";
pub const HELLO_ROUTE: &str = "/hello";
pub const GOOD_PATH: &str = "/the/good/path";
pub const BAD_PATH: &str = "/the/bad/path";

pub const HELLO_BODY: &str = "Hello from the web service !\n";
pub const FORBIDDEN_BODY: &str = "Forbidden path: WEB -> DB\n";

#[derive(Clone)]
struct WebState {
    config: Arc<WebConfig>,
    client: UpstreamClient,
}

pub fn router(config: WebConfig, client: UpstreamClient) -> Router {
    let state = WebState {
        config: Arc::new(config),
        client,
    };
    Router::new()
        .route(HELLO_ROUTE, get(hello))
        .route(GOOD_PATH, get(good_path))
        .route(BAD_PATH, get(bad_path))
        .with_state(state)
}

async fn hello() -> &'static str {
    HELLO_BODY
}

fn allowed(reply: &UpstreamReply) -> Response {
    relay::wrap("Allowed path: WEB -> ", &reply.body, "\n")
}

async fn good_path(State(state): State<WebState>, peer: Peer) -> Response {
    const UPSTREAM: &str = "backend server";

    let reply = match relay::get(
        &state.client,
        peer,
        UPSTREAM,
        &state.config.backend_url,
        None,
        BodyRead::Prefix(MAX_BODY_PREFIX),
    )
    .await
    {
        Ok(reply) => reply,
        Err(_) => return state.config.on_upstream_error.respond(),
    };

    if !reply.is_ok() {
        relay::log_unexpected(peer, UPSTREAM, &reply);
        return ().into_response();
    }

    relay::log_ok(peer, UPSTREAM, &reply);
    allowed(&reply)
}

async fn bad_path(State(state): State<WebState>, peer: Peer) -> Response {
    const UPSTREAM: &str = "db server";

    let reply = match relay::get(
        &state.client,
        peer,
        UPSTREAM,
        &state.config.db_url,
        None,
        BodyRead::Prefix(MAX_BODY_PREFIX),
    )
    .await
    {
        Ok(reply) => reply,
        // Not reaching the db at all is the outcome this route exists to show.
        Err(_) => match state.config.on_upstream_error {
            FailurePolicy::Silent => return FailurePolicy::Silent.respond(),
            FailurePolicy::BadGateway => {
                return (StatusCode::BAD_GATEWAY, FORBIDDEN_BODY).into_response()
            }
        },
    };

    if !reply.is_ok() {
        relay::log_unexpected(peer, UPSTREAM, &reply);
        return (reply.status, FORBIDDEN_BODY).into_response();
    }

    relay::log_ok(peer, UPSTREAM, &reply);
    allowed(&reply)
}
