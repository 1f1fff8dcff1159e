use axum::extract::ws::Message;
use dashmap::DashMap;

use super::ConnectionSender;
use crate::chat::events::ServerEvent;
use crate::registry::ConnectionId;

/// Outbound delivery seam used by the dispatcher.
///
/// Broadcast reaches every attached connection, the sender included.
pub trait Broadcaster: Send + Sync {
    fn send_to_all(&self, event: &ServerEvent);

    fn send_to(&self, id: ConnectionId, event: &ServerEvent);
}

/// Broadcaster backed by the open WebSocket connections.
#[derive(Debug, Default)]
pub struct WsBroadcaster {
    senders: DashMap<ConnectionId, ConnectionSender>,
}

impl WsBroadcaster {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    /// Start delivering frames to `id`.
    pub fn attach(&self, id: ConnectionId, sender: ConnectionSender) {
        self.senders.insert(id, sender);
        tracing::debug!(
            connection_id = %id,
            connections = self.senders.len(),
            "Connection attached"
        );
    }

    pub fn detach(&self, id: ConnectionId) {
        self.senders.remove(&id);
        tracing::debug!(
            connection_id = %id,
            connections = self.senders.len(),
            "Connection detached"
        );
    }

    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }
}

/// Encode once; every recipient gets a cheap clone of the same frame.
fn encode(event: &ServerEvent) -> Option<Message> {
    match event.to_json() {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::warn!(event = event.name(), error = %e, "Failed to encode event");
            None
        }
    }
}

impl Broadcaster for WsBroadcaster {
    fn send_to_all(&self, event: &ServerEvent) {
        let Some(msg) = encode(event) else {
            return;
        };
        for entry in self.senders.iter() {
            let _ = entry.value().send(msg.clone());
        }
    }

    fn send_to(&self, id: ConnectionId, event: &ServerEvent) {
        let Some(msg) = encode(event) else {
            return;
        };
        if let Some(sender) = self.senders.get(&id) {
            let _ = sender.send(msg);
        }
    }
}
