//! Backend service: relays the good path to the db service.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::config::BackendConfig;
use crate::http::{BodyRead, Peer, UpstreamClient, MAX_BODY_PREFIX};
use crate::services::relay;

pub const NAME: &str = "backend";
pub const ROUTE: &str = "/good/backend";

const UPSTREAM: &str = "db server";

#[derive(Clone)]
struct BackendState {
    config: Arc<BackendConfig>,
    client: UpstreamClient,
}

pub fn router(config: BackendConfig, client: UpstreamClient) -> Router {
    let state = BackendState {
        config: Arc::new(config),
        client,
    };
    Router::new()
        .route(ROUTE, get(good_backend))
        .with_state(state)
}

async fn good_backend(State(state): State<BackendState>, peer: Peer) -> Response {
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
        Err(_) => return state.config.on_upstream_error.respond(),
    };

    if !reply.is_ok() {
        relay::log_unexpected(peer, UPSTREAM, &reply);
        return ().into_response();
    }

    relay::log_ok(peer, UPSTREAM, &reply);
    relay::wrap("BACKEND -> ", &reply.body, "")
}
