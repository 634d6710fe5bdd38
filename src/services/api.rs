//! API gateway: the outermost hop, in front of the web service.
//!
//! Forwards the web service's public routes with the caller's headers.
//! Unlike the inner relays it reads upstream bodies whole.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::config::{ApiConfig, FailurePolicy};
use crate::http::headers::forwardable;
use crate::http::{BodyRead, Peer, UpstreamClient, UpstreamReply};
use crate::services::relay;
use crate::services::web::{BAD_PATH, GOOD_PATH, HELLO_ROUTE};

pub const NAME: &str = "api";
pub const ROOT_BODY: &str = "Hello, World!";
pub const FORBIDDEN_BODY: &str = "Access to the Web service is forbidden.\n";

const UPSTREAM: &str = "web server";

#[derive(Clone)]
struct ApiState {
    config: Arc<ApiConfig>,
    client: UpstreamClient,
}

pub fn router(config: ApiConfig, client: UpstreamClient) -> Router {
    let state = ApiState {
        config: Arc::new(config),
        client,
    };
    Router::new()
        .route("/", get(root))
        .route(HELLO_ROUTE, get(guarded))
        .route(GOOD_PATH, get(guarded))
        .route(BAD_PATH, get(passthrough))
        .with_state(state)
}

async fn root() -> &'static str {
    ROOT_BODY
}

/// Join the configured web base URL and the inbound path.
fn upstream_url(base: &str, uri: &Uri) -> String {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("{}{}", base.trim_end_matches('/'), path)
}

async fn forward(
    state: &ApiState,
    peer: Peer,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<UpstreamReply, Response> {
    let url = upstream_url(&state.config.web_url, uri);
    relay::get(
        &state.client,
        peer,
        UPSTREAM,
        &url,
        Some(&forwardable(headers)),
        BodyRead::Full,
    )
    .await
    .map_err(|_| match state.config.on_upstream_error {
        // Nothing to swallow into here: an unanswered forward is our error.
        FailurePolicy::Silent => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        FailurePolicy::BadGateway => StatusCode::BAD_GATEWAY.into_response(),
    })
}

fn verbatim(reply: UpstreamReply) -> Response {
    let mut response = (reply.status, reply.body).into_response();
    match reply.content_type {
        Some(content_type) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    response
}

/// `/hello` and the good path: anything but 200 is reported as forbidden.
async fn guarded(
    State(state): State<ApiState>,
    peer: Peer,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let reply = match forward(&state, peer, &uri, &headers).await {
        Ok(reply) => reply,
        Err(response) => return response,
    };

    if !reply.is_ok() {
        relay::log_unexpected(peer, UPSTREAM, &reply);
        return (reply.status, FORBIDDEN_BODY).into_response();
    }
    verbatim(reply)
}

/// The bad path: whatever the web service answers goes back unchanged.
async fn passthrough(
    State(state): State<ApiState>,
    peer: Peer,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match forward(&state, peer, &uri, &headers).await {
        Ok(reply) => verbatim(reply),
        Err(response) => response,
    }
}
