use axum::{response::Html, routing::get, Router};

use crate::state::AppState;
use crate::ws::handler as ws_handler;

/// Single-page chat client served at `/`.
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Build the full axum Router: the client page, the relay socket and a health check.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler::ws_upgrade))
        .route("/health", get(health_check))
        .with_state(state)
}

/// GET / serves the static chat client
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Basic health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
