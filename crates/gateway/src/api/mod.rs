use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod inbound;

/// Build the HTTP surface: the inbound webhook plus a liveness probe.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/inbound", post(inbound::inbound))
        .route("/v1/health", get(health))
}

async fn health() -> &'static str {
    "ok"
}
