//! DB service: the leaf of the chain.

use axum::{routing::get, Router};

pub const NAME: &str = "db";
pub const ROUTE: &str = "/good/db";
pub const BODY: &str = "DB";

pub fn router() -> Router {
    Router::new().route(ROUTE, get(good_db))
}

async fn good_db() -> &'static str {
    BODY
}
