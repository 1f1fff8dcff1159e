use axum::{
    extract::{ws::WebSocketUpgrade, ConnectInfo, State},
    response::Response,
};
use std::net::SocketAddr;

use crate::registry::ConnectionId;
use crate::state::AppState;
use crate::ws::actor;

/// GET /ws
/// Upgrades to the relay WebSocket. Each upgraded socket gets a fresh
/// connection id and its own actor.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    let connection_id = ConnectionId::new();
    tracing::debug!(
        connection_id = %connection_id,
        peer = %peer,
        "WebSocket upgrade requested"
    );
    ws.on_upgrade(move |socket| actor::run_connection(socket, state, connection_id))
}
