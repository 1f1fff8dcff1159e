use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use crate::registry::ConnectionId;
use crate::state::AppState;
use crate::ws::protocol;

/// Run the actor-per-connection pattern for one WebSocket.
///
/// Splits the WebSocket into reader and writer halves:
/// - Writer task: owns the sink, forwards messages from an mpsc channel
/// - Reader loop: decodes text frames and hands them to the dispatcher
///
/// The socket is attached to the broadcaster before the connect event so the
/// client sees its own `user_joined`, and detached before the disconnect event.
pub async fn run_connection(socket: WebSocket, state: AppState, connection_id: ConnectionId) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    // Writer starts first so frames queued by on_connect are flushed promptly
    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    state.connections.attach(connection_id, tx.clone());
    state.dispatcher.on_connect(connection_id);

    tracing::info!(connection_id = %connection_id, "WebSocket actor started");

    // Track pong reception
    let (pong_tx, mut pong_rx) = mpsc::unbounded_channel::<()>();

    // Ping task: sends periodic pings and monitors pong responses
    let ping_tx = tx.clone();
    let ping_interval = state.ping_interval;
    let pong_timeout = state.pong_timeout;
    let mut ping_handle = tokio::spawn(async move {
        let mut ping_timer = interval(ping_interval);
        // Skip the first immediate tick
        ping_timer.tick().await;

        loop {
            ping_timer.tick().await;

            if ping_tx.send(Message::Ping(vec![1, 2, 3, 4].into())).is_err() {
                // Writer task has died, connection is gone
                break;
            }

            match timeout(pong_timeout, pong_rx.recv()).await {
                Ok(Some(())) => {}
                _ => {
                    tracing::warn!(connection_id = %connection_id, "Pong timeout, closing connection");
                    let _ = ping_tx.send(Message::Close(Some(CloseFrame {
                        code: 1001,
                        reason: "Pong timeout".into(),
                    })));
                    break;
                }
            }
        }
    });

    // Reader loop: process incoming WebSocket messages until the client goes
    // away or the ping task gives up on it
    loop {
        let next = tokio::select! {
            next = ws_receiver.next() => next,
            _ = &mut ping_handle => {
                tracing::info!(connection_id = %connection_id, "Liveness check failed");
                break;
            }
        };

        match next {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    protocol::handle_text_message(text.as_str(), &state, connection_id);
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        bytes = data.len(),
                        "Ignoring binary frame"
                    );
                }
                Message::Pong(_) => {
                    let _ = pong_tx.send(());
                }
                Message::Ping(data) => {
                    let _ = tx.send(Message::Pong(data));
                }
                Message::Close(frame) => {
                    tracing::info!(
                        connection_id = %connection_id,
                        reason = ?frame,
                        "Client initiated close"
                    );
                    break;
                }
            },
            Some(Err(e)) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "WebSocket receive error"
                );
                break;
            }
            None => {
                tracing::info!(connection_id = %connection_id, "WebSocket stream ended");
                break;
            }
        }
    }

    // Cleanup: abort writer and ping tasks
    writer_handle.abort();
    ping_handle.abort();

    // Stop delivery to this socket, then announce the departure to the rest
    state.connections.detach(connection_id);
    state.dispatcher.on_disconnect(connection_id);

    tracing::info!(connection_id = %connection_id, "WebSocket actor stopped");
}

/// Writer task: receives messages from mpsc channel and forwards them to the WebSocket sink.
async fn writer_task(
    mut ws_sender: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if ws_sender.send(msg).await.is_err() {
            // WebSocket send failed, connection is broken
            break;
        }
    }
}
