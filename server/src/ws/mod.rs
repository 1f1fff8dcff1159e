pub mod actor;
pub mod broadcast;
pub mod handler;
pub mod protocol;

use tokio::sync::mpsc;

/// Sender half of a WebSocket connection's outbound channel.
/// Anything holding a clone can push frames to that client.
pub type ConnectionSender = mpsc::UnboundedSender<axum::extract::ws::Message>;
